//! Tests for the generated exports and the boundary mapping

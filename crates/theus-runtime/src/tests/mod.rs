//! Tests for the host runtime, driven by hand-written text-format modules

//! Signatures `#[c_compatible]` must refuse, each with the message a user
//! sees. Expected output lives next to each case in `tests/fail/*.stderr`.

#[test]
fn rejected_impls() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/fail/*.rs");
}

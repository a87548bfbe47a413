/// Initialises the `env_logger` backend for tests that do not use the
/// `test_log::test` attribute. Calling it more than once is harmless.
pub fn test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

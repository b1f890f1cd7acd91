fn main() {
    // The ESP-IDF build environment only exists when cross-compiling for the
    // target; host builds (unit tests) skip it.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}

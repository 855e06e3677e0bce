fn main() {
    // Emit ESP-IDF link arguments only for firmware-image builds; host-side
    // test builds (--no-default-features) skip the embuild step entirely.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

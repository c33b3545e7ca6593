fn main() {
    println!("cargo:rerun-if-env-changed=TOUCHLOCK_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=TOUCHLOCK_WIFI_PASS");
    println!("cargo:rerun-if-env-changed=TOUCHLOCK_CONFIG_JSON");

    // Host builds (tests, simulation) never touch the ESP-IDF toolchain.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}

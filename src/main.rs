fn main() {
    std::process::exit(openapi_sync::run());
}

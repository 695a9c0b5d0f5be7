fn main() -> std::process::ExitCode {
    primebench::run()
}

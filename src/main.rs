fn main() -> std::process::ExitCode {
    region_watch_lib::run()
}

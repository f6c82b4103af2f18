fn main() {
    std::process::exit(termbonsai::run(std::env::args_os()));
}

fn main() {
    if let Err(e) = declscope_cli::run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

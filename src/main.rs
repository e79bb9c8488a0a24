fn main() {
    if let Err(err) = shape_import::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

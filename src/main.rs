fn main() {
    if let Err(err) = procure_etl::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

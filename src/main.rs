fn main() {
    if let Err(err) = client_planner_lib::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

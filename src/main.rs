fn main() {
    hostprep::run_cli();
}

fn main() {
    vibeprompt::app::cli::run();
}

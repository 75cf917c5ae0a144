fn main() {
    freshair::config::load_dotenv();
    freshair::logging::init();
    dioxus::launch(freshair::ui::App);
}

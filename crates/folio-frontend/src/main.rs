fn main() {
    folio::platform::browser::start();
}

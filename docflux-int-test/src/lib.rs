pub mod test_util;

#[ctor::ctor]
fn init_logging() {
    colog::init();
}

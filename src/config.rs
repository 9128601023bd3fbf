pub mod back_shared;

pub fn validate() {
    back_shared::validate();
    crate::infer::config::validate();
}

//! XML navigation helpers over `roxmltree`.

mod utils;

pub use utils::{
    collect_text, element_children, find_child, find_children, flag_attribute,
    following_elements, get_tag_name, has_tag, optional_attribute, required_attribute,
};

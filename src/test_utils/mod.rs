#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use form::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    must_get_form, select_option_values, selected_option_text,
};
pub(crate) use html::{assert_valid_html, parse_html_document};
pub(crate) use http::get_header;

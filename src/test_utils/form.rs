use scraper::{ElementRef, Html, Selector};

#[track_caller]
pub(crate) fn must_get_form(html: &Html) -> ElementRef<'_> {
    let form_selector = Selector::parse("form").expect("Could not parse selector");

    html.select(&form_selector)
        .next()
        .expect("The page does not contain a form")
}

#[track_caller]
pub(crate) fn assert_hx_endpoint(form: &ElementRef, endpoint: &str, hx_attribute: &str) {
    let got = form
        .value()
        .attr(hx_attribute)
        .unwrap_or_else(|| panic!("The form is missing the {hx_attribute} attribute"));

    assert_eq!(got, endpoint);
}

#[track_caller]
pub(crate) fn assert_form_input(form: &ElementRef, name: &str, input_type: &str) {
    let selector = Selector::parse(&format!("input[name={name}]"))
        .expect("Could not parse selector");

    let input = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("The form is missing an input named {name}"));

    assert_eq!(
        input.value().attr("type"),
        Some(input_type),
        "input {name} has the wrong type"
    );
}

#[track_caller]
pub(crate) fn assert_form_input_with_value(form: &ElementRef, name: &str, value: &str) {
    let selector = Selector::parse(&format!("input[name={name}]"))
        .expect("Could not parse selector");

    let input = form
        .select(&selector)
        .next()
        .unwrap_or_else(|| panic!("The form is missing an input named {name}"));

    assert_eq!(
        input.value().attr("value"),
        Some(value),
        "input {name} has the wrong value"
    );
}

#[track_caller]
pub(crate) fn assert_form_submit_button(form: &ElementRef) {
    let selector = Selector::parse("button[type=submit]").expect("Could not parse selector");

    assert!(
        form.select(&selector).next().is_some(),
        "The form is missing a submit button"
    );
}

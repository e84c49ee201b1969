//! The form shared by the add and update expense pages.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::PrimitiveDateTime;

use crate::{
    category::Category,
    expense::{core::MAX_AMOUNT, date_time::format_date_time},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The form data for creating or updating an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// How much was spent in dollars.
    pub amount: f64,
    /// The name of the category, e.g. "Food".
    pub category: String,
    /// An ISO local date-time, e.g. "2024-03-01T10:00:00".
    pub date_time: String,
    /// Text detailing the expense.
    #[serde(default)]
    pub description: String,
}

/// The values to fill the expense form with.
pub struct ExpenseFormDefaults<'a> {
    pub amount: Option<f64>,
    pub category_name: Option<&'a str>,
    pub date_time: Option<PrimitiveDateTime>,
    pub description: &'a str,
}

/// A form that posts the expense fields to `action`.
pub fn expense_form(
    action: &str,
    submit_label: &str,
    defaults: &ExpenseFormDefaults<'_>,
    categories: &[Category],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));
    let date_time_str = defaults.date_time.as_ref().map(format_date_time);

    html! {
        form
            method="post"
            action=(action)
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    max=(MAX_AMOUNT)
                    placeholder="0.00"
                    required
                    autofocus
                    value=[amount_str]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select
                    name="category"
                    id="category"
                    required
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for category in categories {
                        @let name = category.name.as_ref();

                        @if Some(name) == defaults.category_name {
                            option value=(name) selected { (name) }
                        } @else {
                            option value=(name) { (name) }
                        }
                    }
                }
            }

            div
            {
                label for="date_time" class=(FORM_LABEL_STYLE) { "Date and time" }

                input
                    name="date_time"
                    id="date_time"
                    type="datetime-local"
                    step="1"
                    required
                    value=[date_time_str]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    value=(defaults.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button type="submit" tabindex="0" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
        }
    }
}

#[cfg(test)]
mod expense_form_tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        category::{Category, CategoryName},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_valid_html, must_get_form, select_option_values, selected_option_text,
        },
    };

    use super::{ExpenseFormDefaults, expense_form};

    fn categories() -> Vec<Category> {
        ["Food", "Travel"]
            .into_iter()
            .enumerate()
            .map(|(index, name)| Category {
                id: index as i64 + 1,
                name: CategoryName::new_unchecked(name),
            })
            .collect()
    }

    fn render(defaults: &ExpenseFormDefaults<'_>) -> Html {
        let form = expense_form("/submitAdd", "Add", defaults, &categories());

        Html::parse_fragment(&form.into_string())
    }

    #[test]
    fn renders_blank_form() {
        let html = render(&ExpenseFormDefaults {
            amount: None,
            category_name: None,
            date_time: None,
            description: "",
        });
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_eq!(form.value().attr("action"), Some("/submitAdd"));
        assert_eq!(form.value().attr("method"), Some("post"));
        assert_form_input(&form, "amount", "number");
        assert_form_input(&form, "date_time", "datetime-local");
        assert_form_submit_button_with_text(&form, "Add");

        let amount = form
            .select(&Selector::parse("input[name=amount]").unwrap())
            .next()
            .unwrap();
        assert_eq!(amount.value().attr("max"), Some("1000000000"));

        assert_eq!(select_option_values(&form, "category"), ["Food", "Travel"]);
    }

    #[test]
    fn fills_in_defaults() {
        let html = render(&ExpenseFormDefaults {
            amount: Some(42.5),
            category_name: Some("Travel"),
            date_time: Some(datetime!(2024-03-01 10:00:00)),
            description: "Taxi",
        });

        let form = must_get_form(&html);
        assert_form_input_with_value(&form, "amount", "number", "42.50");
        assert_form_input_with_value(&form, "date_time", "datetime-local", "2024-03-01T10:00:00");

        assert_eq!(selected_option_text(&form), ["Travel"]);

        let description = form
            .select(&Selector::parse("input[name=description]").unwrap())
            .next()
            .unwrap();
        assert_eq!(description.value().attr("value"), Some("Taxi"));
    }
}

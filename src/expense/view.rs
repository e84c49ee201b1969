//! HTML rendering for the expense list and filter result pages.

use maud::{Markup, html};
use time::Month;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    category::Category,
    endpoints::{self, with_expense_id},
    expense::{ALL, ExpenseFilter, ExpenseListItem},
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency,
    },
    navigation::NavBar,
};

/// The max number of graphemes to display in the expense table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The choices for the category, year and month selects of the filter form.
pub struct FilterOptions<'a> {
    pub categories: &'a [Category],
    /// Years that appear in the client's expenses, newest first.
    pub years: &'a [i32],
}

/// The page listing every expense the client has recorded.
pub fn expense_list_view(expenses: &[ExpenseListItem], filter_options: &FilterOptions) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSE_LIST).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    a href=(endpoints::ADD_EXPENSE_VIEW) class=(LINK_STYLE) { "Add Expense" }
                }

                (filter_form(filter_options, &ExpenseFilter::default()))

                (expense_table(expenses, "No expenses recorded yet."))
            }
        }
    };

    base("Expenses", &content)
}

/// The page listing the expenses that matched `filter`.
pub fn filter_results_view(
    expenses: &[ExpenseListItem],
    filter_options: &FilterOptions,
    filter: &ExpenseFilter,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::PROCESS_FILTER).into_html();
    let match_count = expenses.len();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Filtered Expenses" }

                    a href=(endpoints::EXPENSE_LIST) class=(LINK_STYLE) { "Show all expenses" }
                }

                p id="filter-summary"
                {
                    (match_count)
                    @if match_count == 1 { " expense" } @else { " expenses" }
                    " matching " (describe_filter(filter)) "."
                }

                (filter_form(filter_options, filter))

                (expense_table(expenses, "No expenses match the filter."))
            }
        }
    };

    base("Filtered Expenses", &content)
}

/// A human readable summary of the active criteria, e.g.
/// "category Food, amount $10.00 to $50.00, year 2023, month May".
fn describe_filter(filter: &ExpenseFilter) -> String {
    let mut criteria = Vec::new();

    if let Some(category) = &filter.category {
        criteria.push(format!("category {category}"));
    }

    if filter.amount_to != f64::MAX {
        criteria.push(format!(
            "amount {} to {}",
            format_currency(filter.amount_from),
            format_currency(filter.amount_to)
        ));
    } else if filter.amount_from != 0.0 {
        criteria.push(format!(
            "amount at least {}",
            format_currency(filter.amount_from)
        ));
    }

    if let Some(year) = filter.year {
        criteria.push(format!("year {year}"));
    }

    if let Some(month) = filter.month.and_then(|month| Month::try_from(month).ok()) {
        criteria.push(format!("month {month}"));
    }

    if criteria.is_empty() {
        "all criteria".to_owned()
    } else {
        criteria.join(", ")
    }
}

fn filter_form(filter_options: &FilterOptions, filter: &ExpenseFilter) -> Markup {
    let selected_category = filter.category.as_ref().map(|category| category.as_ref());
    let amount_from = (filter.amount_from != 0.0).then(|| filter.amount_from.to_string());
    let amount_to = (filter.amount_to != f64::MAX).then(|| filter.amount_to.to_string());

    html! {
        form
            method="post"
            action=(endpoints::PROCESS_FILTER)
            class="grid grid-cols-2 md:grid-cols-6 gap-4 items-end p-4 rounded bg-gray-50 dark:bg-gray-800"
        {
            div
            {
                label for="filter-category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="filter-category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[selected_category.is_none()] { "All" }

                    @for category in filter_options.categories {
                        @let name = category.name.as_ref();
                        option value=(name) selected[selected_category == Some(name)] { (name) }
                    }
                }
            }

            div
            {
                label for="filter-from" class=(FORM_LABEL_STYLE) { "From" }

                input
                    name="from"
                    id="filter-from"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=[amount_from]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-to" class=(FORM_LABEL_STYLE) { "To" }

                input
                    name="to"
                    id="filter-to"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="Any"
                    value=[amount_to]
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="filter-year" class=(FORM_LABEL_STYLE) { "Year" }

                select name="year" id="filter-year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[filter.year.is_none()] { "All" }

                    @for year in filter_options.years {
                        option value=(year) selected[filter.year == Some(*year)] { (year) }
                    }
                }
            }

            div
            {
                label for="filter-month" class=(FORM_LABEL_STYLE) { "Month" }

                select name="month" id="filter-month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value=(ALL) selected[filter.month.is_none()] { "All" }

                    @for month_number in 1..=12u8 {
                        @if let Ok(month) = Month::try_from(month_number) {
                            option
                                value=(format!("{month_number:02}"))
                                selected[filter.month == Some(month_number)]
                            {
                                (month)
                            }
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Filter" }
        }
    }
}

fn expense_table(expenses: &[ExpenseListItem], empty_message: &str) -> Markup {
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    html! {
        div class="overflow-x-auto rounded"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class="px-6 py-3 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (expense_row_view(expense))
                    }

                    @if expenses.is_empty() {
                        tr
                        {
                            td colspan="6" data-empty-state="true" class="px-6 py-4 text-center"
                            {
                                (empty_message)
                            }
                        }
                    }
                }

                tfoot
                {
                    tr class="font-semibold text-gray-900 dark:text-white"
                    {
                        td id="expense-total" class="px-6 py-3 text-right" { (format_currency(total)) }
                        th scope="row" colspan="5" class=(TABLE_CELL_STYLE) { "Total" }
                    }
                }
            }
        }
    }
}

fn expense_row_view(expense: &ExpenseListItem) -> Markup {
    let (description, tooltip) = format_description(&expense.description);
    let edit_url = with_expense_id(endpoints::UPDATE_EXPENSE_VIEW, expense.id);
    let delete_url = with_expense_id(endpoints::DELETE_EXPENSE, expense.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-expense-id=(expense.id)
        {
            td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
            td class=(TABLE_CELL_STYLE) { (expense.category_name) }
            td class=(TABLE_CELL_STYLE) { (expense.date) }
            td class=(TABLE_CELL_STYLE) { (expense.time) }
            td class=(TABLE_CELL_STYLE) title=[tooltip] { (description) }
            td class=(TABLE_CELL_STYLE)
            {
                div class="flex gap-4"
                {
                    a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                    a href=(delete_url) class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        let truncated = truncated + "...";
        (truncated, Some(description))
    }
}

#[cfg(test)]
mod view_tests {
    use crate::{category::CategoryName, expense::ExpenseFilter};

    use super::{MAX_DESCRIPTION_GRAPHEMES, describe_filter, format_description};

    #[test]
    fn short_description_is_unchanged() {
        let (description, tooltip) = format_description("Taxi");

        assert_eq!(description, "Taxi");
        assert_eq!(tooltip, None);
    }

    #[test]
    fn long_description_is_truncated_by_grapheme() {
        let long_description = "🇳🇿".repeat(MAX_DESCRIPTION_GRAPHEMES + 1);

        let (description, tooltip) = format_description(&long_description);

        assert_eq!(
            description,
            "🇳🇿".repeat(MAX_DESCRIPTION_GRAPHEMES - 3) + "..."
        );
        assert_eq!(tooltip, Some(long_description.as_str()));
    }

    #[test]
    fn describes_default_filter() {
        assert_eq!(describe_filter(&ExpenseFilter::default()), "all criteria");
    }

    #[test]
    fn describes_every_criterion() {
        let filter = ExpenseFilter {
            category: Some(CategoryName::new_unchecked("Food")),
            amount_from: 10.0,
            amount_to: 50.0,
            year: Some(2023),
            month: Some(5),
        };

        assert_eq!(
            describe_filter(&filter),
            "category Food, amount $10.00 to $50.00, year 2023, month May"
        );
    }
}

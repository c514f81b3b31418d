use crate::model::Customer;

/// Customers whose name contains `term`, ignoring case, in source order.
/// An empty term keeps everyone.
pub fn filter<'a>(customers: &'a [Customer], term: &str) -> Vec<&'a Customer> {
    let needle = term.to_lowercase();
    customers
        .iter()
        .filter(|c| matches_name(&c.name, &needle))
        .collect()
}

fn matches_name(name: &str, lowered_term: &str) -> bool {
    lowered_term.is_empty() || name.to_lowercase().contains(lowered_term)
}

use crate::app::AppState;
use crate::model::UserRecord;

/// Users whose name contains `query`, ignoring case, in their original order.
///
/// An empty query returns every user.
pub fn filter_by_name<'a>(users: &'a [UserRecord], query: &str) -> Vec<&'a UserRecord> {
    if query.is_empty() {
        return users.iter().collect();
    }
    let q = query.to_lowercase();
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&q))
        .collect()
}

/// Re-run the name filter for the current query and keep the selection in range.
pub fn apply_search(app: &mut AppState) {
    let visible = app.store.filter_by_name_substring(&app.search_query).len();
    if app.selected_index >= visible {
        app.selected_index = visible.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::InputMode;

    fn mk_user(id: u64, name: &str) -> UserRecord {
        UserRecord {
            id,
            name: name.to_string(),
            ..UserRecord::default()
        }
    }

    fn names<'a>(found: &[&'a UserRecord]) -> Vec<&'a str> {
        found.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn filter_is_case_insensitive_and_ordered() {
        let users = vec![mk_user(1, "John"), mk_user(2, "Bob"), mk_user(3, "Joanna")];
        assert_eq!(names(&filter_by_name(&users, "jo")), vec!["John", "Joanna"]);
        assert_eq!(names(&filter_by_name(&users, "JO")), vec!["John", "Joanna"]);
        assert_eq!(names(&filter_by_name(&users, "")), vec!["John", "Bob", "Joanna"]);
        assert!(filter_by_name(&users, "zed").is_empty());
    }

    #[test]
    fn filter_treats_special_characters_literally() {
        let users = vec![mk_user(1, "Mrs. Dennis [Schulist]"), mk_user(2, "Kurtis")];
        assert_eq!(names(&filter_by_name(&users, "[")), vec!["Mrs. Dennis [Schulist]"]);
        assert_eq!(names(&filter_by_name(&users, ".*")), Vec::<&str>::new());
    }

    #[test]
    fn apply_search_clamps_selection() {
        let mut app = AppState::new();
        app.store.load(vec![mk_user(1, "alice"), mk_user(2, "bob"), mk_user(3, "carol")]);
        app.selected_index = 2;
        app.input_mode = InputMode::Search;
        app.search_query = "bo".to_string();
        apply_search(&mut app);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.visible_users().len(), 1);

        app.search_query = "nobody".to_string();
        apply_search(&mut app);
        assert_eq!(app.selected_index, 0);
        assert!(app.selected_user().is_none());
    }
}

// Unit tests for user-directory
// These tests go through the public API only

mod validate_tests {
    use user_directory::validate::{
        CREATE_ADDRESS_MSG, CREATE_EMAIL_MSG, CREATE_NAME_MSG, CREATE_PHONE_MSG, EDIT_EMAIL_MSG,
        EDIT_PHONE_MSG, EditForm, Field, UserForm, validate_create, validate_edit,
    };

    fn form(name: &str, email: &str, phone: &str, street: &str, city: &str) -> UserForm {
        UserForm {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            street: street.into(),
            city: city.into(),
            company_name: String::new(),
        }
    }

    #[test]
    fn create_reports_first_failing_rule_only() {
        let err = validate_create(&form("Al", "bad", "123", "", "")).unwrap_err();
        assert_eq!(err.field, Field::Name);
        assert_eq!(err.message, CREATE_NAME_MSG);
        assert_eq!(err.to_string(), CREATE_NAME_MSG);

        let err = validate_create(&form("Alice", "bad", "123", "", "")).unwrap_err();
        assert_eq!(err.message, CREATE_EMAIL_MSG);

        let err = validate_create(&form("Alice", "a@b.co", "123", "", "")).unwrap_err();
        assert_eq!(err.message, CREATE_PHONE_MSG);

        let err = validate_create(&form("Alice", "a@b.co", "5551234567", "Main", "")).unwrap_err();
        assert_eq!((err.field, err.message), (Field::City, CREATE_ADDRESS_MSG));
    }

    #[test]
    fn create_accepts_complete_form_without_company() {
        assert!(validate_create(&form("Alice", "a@b.co", "5551234567", "Main", "Oxford")).is_ok());
    }

    #[test]
    fn edit_reports_every_failing_field() {
        let errors = validate_edit(&EditForm {
            name: "Bob".into(),
            email: "not-an-email".into(),
            phone: "123".into(),
        });
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Email, Field::Phone]);
        assert_eq!(errors.get(Field::Email), Some(EDIT_EMAIL_MSG));
        assert_eq!(errors.get(Field::Phone), Some(EDIT_PHONE_MSG));
        assert!(!errors.contains(Field::Name));
    }

    #[test]
    fn edit_errors_serialize_by_field_name() {
        let errors = validate_edit(&EditForm::default());
        let json = serde_json::to_value(&errors).unwrap();
        assert!(json.get("name").is_some());
        assert!(json.get("email").is_some());
        assert!(json.get("phone").is_some());
    }
}

mod store_tests {
    use user_directory::model::{UserRecord, normalize_phone};
    use user_directory::store::{StoreError, UserDirectoryStore};

    fn user(id: u64, name: &str) -> UserRecord {
        UserRecord {
            id,
            name: name.into(),
            ..UserRecord::default()
        }
    }

    fn names(store: &UserDirectoryStore) -> Vec<&str> {
        store.iter().map(|u| u.name.as_str()).collect()
    }

    #[test]
    fn phone_normalization() {
        assert_eq!(normalize_phone("123-456-7890 ext.22"), "1234567890");
        assert_eq!(normalize_phone("12345"), "12345");
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = UserDirectoryStore::new();
        store.load(vec![user(1, "a"), user(2, "b"), user(3, "c")]);
        assert!(store.replace_by_id(user(2, "b2")));
        assert_eq!(names(&store), vec!["a", "b2", "c"]);
        assert!(!store.replace_by_id(user(9, "z")));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn remove_absent_is_a_no_op() {
        let mut store = UserDirectoryStore::new();
        store.load(vec![user(1, "a")]);
        let before = store.clone();
        assert!(store.remove_by_id(7).is_none());
        assert!(store.remove_by_id(7).is_none());
        assert_eq!(store, before);
    }

    #[test]
    fn insert_then_remove_restores_list() {
        let mut store = UserDirectoryStore::new();
        store.load(vec![user(1, "a"), user(2, "b")]);
        let before = store.clone();
        store.insert(user(11, "new")).unwrap();
        assert_eq!(store.as_slice().last().map(|u| u.id), Some(11));
        store.remove_by_id(11);
        assert_eq!(store, before);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let mut store = UserDirectoryStore::new();
        store.load(vec![user(1, "a")]);
        assert_eq!(store.insert(user(1, "again")), Err(StoreError::DuplicateId(1)));
        assert_eq!(names(&store), vec!["a"]);
    }

    #[test]
    fn load_normalizes_phones() {
        let mut store = UserDirectoryStore::new();
        store.load(vec![UserRecord {
            phone: "(555) 123-4567 x9".into(),
            ..user(1, "a")
        }]);
        assert_eq!(store.get(1).map(|u| u.phone.as_str()), Some("5551234567"));
    }
}

mod search_tests {
    use user_directory::model::UserRecord;
    use user_directory::search::filter_by_name;
    use user_directory::store::UserDirectoryStore;

    fn directory() -> UserDirectoryStore {
        let mut store = UserDirectoryStore::new();
        store.load(
            ["John", "Bob", "Joanna"]
                .iter()
                .enumerate()
                .map(|(i, n)| UserRecord {
                    id: i as u64 + 1,
                    name: n.to_string(),
                    ..UserRecord::default()
                })
                .collect(),
        );
        store
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let store = directory();
        let ids: Vec<u64> = store.filter_by_name_substring("").iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn substring_is_case_insensitive() {
        let store = directory();
        let hits: Vec<&str> = store
            .filter_by_name_substring("JO")
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        assert_eq!(hits, vec!["John", "Joanna"]);
        assert!(filter_by_name(store.as_slice(), "zzz").is_empty());
    }
}

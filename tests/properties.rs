use proptest::prelude::*;
use shape_import::{Header, Row, Schema, Value};

fn declared_schema() -> Schema {
    Schema::new(vec![
        Header::new("Lon", "Y"),
        Header::new("Lat", "X"),
        Header::new("Name", "TEXT"),
    ])
}

proptest! {
    #[test]
    fn last_registration_wins(name in "[A-Za-z ]{1,12}", ordinals in prop::collection::vec(0usize..64, 1..8)) {
        let mut schema = declared_schema();
        for ordinal in &ordinals {
            schema.add(name.clone(), *ordinal);
        }
        prop_assert_eq!(schema.imported_columns().get(&name), ordinals.last());
        prop_assert_eq!(schema.imported_columns().len(), 1);
    }

    #[test]
    fn undeclared_writes_leave_row_unchanged(name in "[a-z]{1,10}", value in any::<i64>()) {
        prop_assume!(!["Lon", "Lat", "Name"].contains(&name.as_str()));
        let mut row = Row::new(&declared_schema());
        row.add("Name", "Mast").unwrap();
        let before = row.values().map(|(k, v)| (k.to_string(), v.clone())).collect::<Vec<_>>();

        row.add(&name, value).unwrap();

        let after = row.values().map(|(k, v)| (k.to_string(), v.clone())).collect::<Vec<_>>();
        prop_assert_eq!(before, after);
        prop_assert!(row.get(&name).is_none());
    }

    #[test]
    fn point_values_ignore_declaration_order(x in any::<i64>(), y in any::<i64>(), x_first in any::<bool>()) {
        let headers = if x_first {
            vec![Header::new("Lat", "X"), Header::new("Lon", "Y")]
        } else {
            vec![Header::new("Lon", "Y"), Header::new("Lat", "X")]
        };
        let mut row = Row::new(&Schema::new(headers));
        row.add("Lat", x).unwrap();
        row.add("Lon", y).unwrap();
        let (got_x, got_y) = row.point_values().unwrap();
        prop_assert_eq!(got_x, &Value::Integer(x));
        prop_assert_eq!(got_y, &Value::Integer(y));
    }
}

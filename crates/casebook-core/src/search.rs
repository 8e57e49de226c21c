//! Patient list filtering.

use crate::models::Patient;

/// Case-insensitive substring filter over name, mobile, legacy phone, and
/// reference ID. A blank query matches everything. Pure projection: the
/// source collection is never mutated or reordered.
pub fn filter_patients<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return patients.iter().collect();
    }

    patients
        .iter()
        .filter(|p| {
            contains(&p.name, &needle)
                || contains(&p.mobile, &needle)
                || p.phone.as_deref().map_or(false, |ph| contains(ph, &needle))
                || contains(&p.reference_id, &needle)
        })
        .collect()
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn patient(id: &str, name: &str, mobile: &str) -> Patient {
        Patient {
            id: id.into(),
            name: name.into(),
            mobile: mobile.into(),
            ..Default::default()
        }
    }

    fn roster() -> Vec<Patient> {
        vec![
            patient("p1", "Asha Nair", "9999999999"),
            patient("p2", "Ravi Kumar", "8888888888"),
            patient("p3", "Meena", "7777777777"),
        ]
    }

    #[test]
    fn test_empty_query_returns_everything_in_order() {
        let patients = roster();
        let hits = filter_patients(&patients, "");
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, "p1");
        assert_eq!(hits[1].id, "p2");
        assert_eq!(hits[2].id, "p3");

        let hits = filter_patients(&patients, "   ");
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn test_mobile_digit_match() {
        let patients = roster();
        let hits = filter_patients(&patients, "9");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p1");
    }

    #[test]
    fn test_name_match_ignores_case() {
        let patients = roster();
        let hits = filter_patients(&patients, "ASHA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p1");
    }

    #[test]
    fn test_legacy_phone_and_reference_id_match() {
        let mut patients = roster();
        patients[2].phone = Some("044-2345".into());
        patients[2].reference_id = "REF-42".into();

        let hits = filter_patients(&patients, "2345");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p3");

        let hits = filter_patients(&patients, "ref-42");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "p3");
    }

    #[test]
    fn test_no_match() {
        let patients = roster();
        assert!(filter_patients(&patients, "zzz").is_empty());
    }

    proptest! {
        #[test]
        fn prop_filter_is_a_subset_in_order(query in "[a-z0-9]{0,4}") {
            let patients = roster();
            let hits = filter_patients(&patients, &query);

            prop_assert!(hits.len() <= patients.len());

            // Hits appear in roster order.
            let mut last = 0;
            for hit in &hits {
                let pos = patients.iter().position(|p| p.id == hit.id).unwrap();
                prop_assert!(pos >= last);
                last = pos;
            }
        }

        #[test]
        fn prop_filter_is_idempotent(query in "[a-z0-9]{0,4}") {
            let patients = roster();
            let once: Vec<Patient> =
                filter_patients(&patients, &query).into_iter().cloned().collect();
            let twice = filter_patients(&once, &query);
            prop_assert_eq!(twice.len(), once.len());
        }
    }
}

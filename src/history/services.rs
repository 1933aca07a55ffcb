use super::{
    dto::{HistorySummary, TypeSummary},
    money,
    repo::TypeTotals,
};

/// Fails on a meal type the enum does not know, which means a bad row.
pub fn summarize(rows: Vec<TypeTotals>) -> anyhow::Result<HistorySummary> {
    let entries = rows.iter().map(|r| r.entries).sum();
    let total_cents: i64 = rows.iter().map(|r| r.expense_cents).sum();
    let by_type = rows
        .into_iter()
        .map(|r| -> anyhow::Result<TypeSummary> {
            Ok(TypeSummary {
                meal_type: r.meal_type.parse()?,
                entries: r.entries,
                total_expense: money::from_cents(r.expense_cents),
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(HistorySummary {
        total_expense: money::from_cents(total_cents),
        entries,
        by_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::dto::MealType;

    #[test]
    fn summary_adds_up_types() {
        let summary = summarize(vec![
            TypeTotals {
                meal_type: "cook".into(),
                entries: 3,
                expense_cents: 1200,
            },
            TypeTotals {
                meal_type: "dineout".into(),
                entries: 2,
                expense_cents: 4550,
            },
        ])
        .unwrap();
        assert_eq!(summary.entries, 5);
        assert_eq!(summary.total_expense, 57.5);
        assert_eq!(summary.by_type[1].total_expense, 45.5);
        assert_eq!(summary.by_type[1].meal_type, MealType::Dineout);
    }

    #[test]
    fn unknown_stored_type_is_an_error() {
        let rows = vec![TypeTotals {
            meal_type: "brunch".into(),
            entries: 1,
            expense_cents: 100,
        }];
        assert!(summarize(rows).is_err());
    }

    #[test]
    fn empty_history_summarizes_to_zero() {
        let summary = summarize(Vec::new()).unwrap();
        assert_eq!(summary.entries, 0);
        assert_eq!(summary.total_expense, 0.0);
        assert!(summary.by_type.is_empty());
    }
}

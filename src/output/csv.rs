use anyhow::Result;
use serde::Serialize;

/// Serializes view rows with a header row derived from the field names.
pub fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    for row in rows {
        writer.serialize(row)?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn years_to_csv(years: &[i32]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["year"])?;
    for year in years {
        writer.write_record([year.to_string()])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use super::{rows_to_csv, years_to_csv};
    use crate::analytics::{PartyVoteShare, SeatShare};

    #[test]
    fn writes_header_from_field_names() {
        let csv = rows_to_csv(&[
            SeatShare {
                party: "BJP".to_string(),
                seats: 303,
            },
            SeatShare {
                party: "INC".to_string(),
                seats: 52,
            },
        ])
        .expect("csv failed");
        assert_eq!(csv, "party,seats\nBJP,303\nINC,52\n");
    }

    #[test]
    fn quotes_fields_with_commas() {
        let csv = rows_to_csv(&[PartyVoteShare {
            party: "Communist Party of India (Marxist), Kerala".to_string(),
            vote_share_percentage: 1.75,
        }])
        .expect("csv failed");
        assert_eq!(
            csv,
            "party,vote_share_percentage\n\"Communist Party of India (Marxist), Kerala\",1.75\n"
        );
    }

    #[test]
    fn years_have_a_single_column() {
        assert_eq!(years_to_csv(&[2014, 2019]).expect("csv failed"), "year\n2014\n2019\n");
    }
}

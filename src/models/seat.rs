use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub id: i64,
    pub studio_id: i64,
    pub seat_number: String,
    pub is_available: bool,
    #[serde(default)]
    pub studio_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Seat {
    /// Числовая часть номера места: все не-цифры отбрасываются ("B12" -> 12, "A1B2" -> 12).
    /// `None`, если цифр нет или число не помещается в u64.
    pub fn number_key(&self) -> Option<u64> {
        let digits: String = self
            .seat_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }
}

/// Сортирует места по числовой части номера.
/// Места без цифр идут в конце, равные ключи сохраняют исходный порядок (сортировка стабильная).
pub fn sort_seats(seats: &mut [Seat]) {
    seats.sort_by_key(|seat| {
        let key = seat.number_key();
        (key.is_none(), key)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn seat(id: i64, number: &str) -> Seat {
        Seat {
            id,
            studio_id: 1,
            seat_number: number.to_string(),
            is_available: true,
            studio_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn numbers(seats: &[Seat]) -> Vec<&str> {
        seats.iter().map(|s| s.seat_number.as_str()).collect()
    }

    #[test]
    fn sorts_numerically_not_lexically() {
        let mut seats = vec![seat(1, "A10"), seat(2, "A2"), seat(3, "A5")];
        sort_seats(&mut seats);
        assert_eq!(numbers(&seats), vec!["A2", "A5", "A10"]);
    }

    #[test]
    fn seats_without_digits_go_last_in_fetch_order() {
        let mut seats = vec![
            seat(1, "VIP"),
            seat(2, "B3"),
            seat(3, "Balcony"),
            seat(4, "A1"),
        ];
        sort_seats(&mut seats);
        assert_eq!(numbers(&seats), vec!["A1", "B3", "VIP", "Balcony"]);
    }

    #[test]
    fn row_letters_are_ignored_for_ordering() {
        let mut seats = vec![seat(1, "C1"), seat(2, "A1"), seat(3, "B0")];
        sort_seats(&mut seats);
        // "B0" -> 0, затем "C1" и "A1" с одинаковым ключом в исходном порядке
        assert_eq!(numbers(&seats), vec!["B0", "C1", "A1"]);
    }

    #[test]
    fn digits_are_concatenated() {
        assert_eq!(seat(1, "A1B2").number_key(), Some(12));
        assert_eq!(seat(1, "R-07").number_key(), Some(7));
        assert_eq!(seat(1, "").number_key(), None);
    }

    proptest! {
        #[test]
        fn sorted_inventory_is_ordered_by_number_key(
            raw in proptest::collection::vec("[A-Z]{0,2}[0-9]{0,4}", 0..40)
        ) {
            let mut seats: Vec<Seat> = raw
                .iter()
                .enumerate()
                .map(|(i, n)| seat(i as i64, n))
                .collect();
            sort_seats(&mut seats);

            for pair in seats.windows(2) {
                let (a, b) = (pair[0].number_key(), pair[1].number_key());
                match (a, b) {
                    (Some(x), Some(y)) => {
                        prop_assert!(x <= y);
                        if x == y {
                            prop_assert!(pair[0].id < pair[1].id);
                        }
                    }
                    (None, Some(_)) => prop_assert!(false, "non-numeric seat before numeric"),
                    (None, None) => prop_assert!(pair[0].id < pair[1].id),
                    (Some(_), None) => {}
                }
            }
        }
    }
}

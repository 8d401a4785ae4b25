/// Distance-difference thresholds (Angstroms) of the local distance difference test.
pub const LDDT_THRESHOLDS: [f64; 4] = [0.5, 1.0, 2.0, 4.0];

/// One reference contact: its distance in the reference structure and, if the contact
/// could be reconstructed in the model, its distance there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactDistance {
    pub reference: f64,
    pub model: Option<f64>,
}

impl ContactDistance {
    pub fn new(reference: f64, model: Option<f64>) -> Self {
        Self { reference, model }
    }

    fn is_conserved(&self, threshold: f64) -> bool {
        self.model
            .is_some_and(|model| (model - self.reference).abs() < threshold)
    }
}

/// Local distance difference test over a set of reference contacts.
///
/// For every threshold, the fraction of contacts whose model distance deviates from the
/// reference distance by less than the threshold is computed; the score is the mean of
/// these fractions. Contacts missing from the model count as not conserved.
///
/// # Return
///
/// A score in `[0, 1]`, or `None` if there are no contacts or no thresholds.
pub fn local_distance_test<I>(contacts: I, thresholds: &[f64]) -> Option<f64>
where
    I: IntoIterator<Item = ContactDistance>,
{
    if thresholds.is_empty() {
        return None;
    }
    let mut total = 0usize;
    let mut conserved = 0usize;
    for contact in contacts {
        total += thresholds.len();
        conserved += thresholds
            .iter()
            .filter(|&&threshold| contact.is_conserved(threshold))
            .count();
    }
    if total == 0 {
        None
    } else {
        Some(conserved as f64 / total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_distances_score_one() {
        let contacts = [
            ContactDistance::new(3.0, Some(3.0)),
            ContactDistance::new(5.5, Some(5.5)),
        ];
        assert_eq!(local_distance_test(contacts, &LDDT_THRESHOLDS), Some(1.0));
    }

    #[test]
    fn missing_model_contacts_are_not_conserved() {
        let contacts = [
            ContactDistance::new(3.0, Some(3.0)),
            ContactDistance::new(4.0, None),
        ];
        assert_eq!(local_distance_test(contacts, &LDDT_THRESHOLDS), Some(0.5));
    }

    #[test]
    fn partial_deviation_counts_per_threshold() {
        // 1.5 A deviation is conserved only at the 2 and 4 A thresholds.
        let contacts = [ContactDistance::new(4.0, Some(5.5))];
        assert_eq!(local_distance_test(contacts, &LDDT_THRESHOLDS), Some(0.5));
    }

    #[test]
    fn no_contacts_yields_none() {
        assert_eq!(local_distance_test(Vec::new(), &LDDT_THRESHOLDS), None);
        assert_eq!(
            local_distance_test([ContactDistance::new(1.0, Some(1.0))], &[]),
            None
        );
    }
}

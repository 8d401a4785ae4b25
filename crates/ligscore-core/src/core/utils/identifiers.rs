use phf::{Map, Set, phf_map, phf_set};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT", "H2O", "DOD", "D2O", "TIP", "TIP3", "TP3", "SOL", "SPC",
};

static AMINO_ACID_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
    "SEC", "PYL", "MSE", "HSD", "HSE", "HSP", "HID", "HIE", "HIP", "CYX",
};

static NUCLEOTIDE_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "A", "C", "G", "U", "I", "DA", "DC", "DG", "DT", "DI", "DU",
};

// Atom of the preceding residue => bonded atom of the following residue.
static POLYMER_LINK_ATOMS: Map<&'static str, &'static str> = phf_map! {
    "C" => "N",
    "O3'" => "P",
    "O3*" => "P",
};

pub fn is_water_name(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_amino_acid_name(residue_name: &str) -> bool {
    AMINO_ACID_RESIDUE_NAMES.contains(residue_name.trim())
}

pub fn is_nucleotide_name(residue_name: &str) -> bool {
    NUCLEOTIDE_RESIDUE_NAMES.contains(residue_name.trim())
}

/// For an atom name that starts a polymer linkage (peptide or phosphodiester), returns the
/// name of the atom it bonds to in the next residue.
pub fn polymer_link_partner(atom_name: &str) -> Option<&'static str> {
    POLYMER_LINK_ATOMS.get(atom_name.trim()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_water_name_recognizes_common_water_models() {
        assert!(is_water_name("HOH"));
        assert!(is_water_name(" WAT "));
        assert!(is_water_name("TIP3"));
        assert!(!is_water_name("hoh"));
        assert!(!is_water_name("ATP"));
    }

    #[test]
    fn is_amino_acid_name_covers_standard_and_variant_names() {
        assert!(is_amino_acid_name("GLY"));
        assert!(is_amino_acid_name("MSE"));
        assert!(is_amino_acid_name("HSE"));
        assert!(!is_amino_acid_name("NAG"));
    }

    #[test]
    fn is_nucleotide_name_covers_dna_and_rna() {
        assert!(is_nucleotide_name("DA"));
        assert!(is_nucleotide_name("U"));
        assert!(!is_nucleotide_name("ADP"));
    }

    #[test]
    fn polymer_link_partner_maps_peptide_and_phosphodiester_atoms() {
        assert_eq!(polymer_link_partner("C"), Some("N"));
        assert_eq!(polymer_link_partner(" O3' "), Some("P"));
        assert_eq!(polymer_link_partner("CA"), None);
    }
}

/// One line of the exam composition: draw `count` questions from
/// `sub_theme` and label them `label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaEntry {
    pub sub_theme: &'static str,
    pub count: usize,
    pub label: &'static str,
}

const fn quota(sub_theme: &'static str, count: usize, label: &'static str) -> QuotaEntry {
    QuotaEntry {
        sub_theme,
        count,
        label,
    }
}

pub const PRINCIPES: &str = "Principes & Valeurs";
pub const INSTITUTIONS: &str = "Institutions";
pub const DROITS: &str = "Droits & Devoirs";
pub const HISTOIRE: &str = "Histoire & Géo";
pub const VIVRE: &str = "Vivre en France";

/// Official composition of a simulated exam, in presentation order.
pub const SIMULATION_QUOTAS: [QuotaEntry; 14] = [
    // bloc 1
    quota("devise_symboles", 3, PRINCIPES),
    quota("laicite", 2, PRINCIPES),
    // bloc 2
    quota("democratie_vote", 3, INSTITUTIONS),
    quota("organisation_republique", 2, INSTITUTIONS),
    quota("institutions_europeennes", 1, INSTITUTIONS),
    // bloc 3
    quota("droits_et_libertes_fondamentales", 2, DROITS),
    quota("obligations_et_devoirs_du_citoyen", 3, DROITS),
    // bloc 4
    quota("grandes_periodes_et_personnages_historiques", 3, HISTOIRE),
    quota("territoires_et_geographie", 3, HISTOIRE),
    quota("patrimoine_francais", 2, HISTOIRE),
    // bloc 5
    quota("sinstaller_et_resider_en_france", 1, VIVRE),
    quota("acces_aux_soins", 1, VIVRE),
    quota("travailler_en_france", 1, VIVRE),
    quota("autorite_parentale_et_systeme_educatif", 1, VIVRE),
];

/// A block that can be practised on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeTheme {
    pub key: &'static str,
    pub label: &'static str,
}

pub const PRACTICE_THEMES: [PracticeTheme; 5] = [
    PracticeTheme {
        key: "bloc1_principes_valeurs",
        label: PRINCIPES,
    },
    PracticeTheme {
        key: "bloc2_institutionnel_politique",
        label: INSTITUTIONS,
    },
    PracticeTheme {
        key: "bloc3_droits_et_devoirs",
        label: DROITS,
    },
    PracticeTheme {
        key: "bloc4_histoire_geo_culture",
        label: HISTOIRE,
    },
    PracticeTheme {
        key: "bloc5_vivre_en_societe",
        label: VIVRE,
    },
];

pub fn total(quotas: &[QuotaEntry]) -> usize {
    quotas.iter().map(|q| q.count).sum()
}

pub fn practice_theme(key: &str) -> Option<&'static PracticeTheme> {
    PRACTICE_THEMES.iter().find(|t| t.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn simulation_has_twenty_eight_questions() {
        assert_eq!(total(&SIMULATION_QUOTAS), 28);
    }

    #[test]
    fn sub_themes_are_unique() {
        let keys: HashSet<&str> = SIMULATION_QUOTAS.iter().map(|q| q.sub_theme).collect();
        assert_eq!(keys.len(), SIMULATION_QUOTAS.len());
    }

    #[test]
    fn labels_form_contiguous_blocks() {
        let labels: Vec<&str> = SIMULATION_QUOTAS.iter().map(|q| q.label).collect();
        let mut seen = Vec::new();
        for label in labels {
            if seen.last() != Some(&label) {
                assert!(!seen.contains(&label), "{label} appears twice");
                seen.push(label);
            }
        }
        assert_eq!(seen, vec![PRINCIPES, INSTITUTIONS, DROITS, HISTOIRE, VIVRE]);
    }

    #[test]
    fn practice_theme_lookup() {
        assert_eq!(
            practice_theme("bloc3_droits_et_devoirs").map(|t| t.label),
            Some(DROITS)
        );
        assert!(practice_theme("bloc9").is_none());
    }
}

//! Static country table used to print destination names on international
//! shipping labels.

/// A destination country with its Portuguese and English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    pub code: &'static str,
    pub pt: &'static str,
    pub en: &'static str,
}

const fn country(code: &'static str, pt: &'static str, en: &'static str) -> Country {
    Country { code, pt, en }
}

pub static COUNTRIES: &[Country] = &[
    country("AR", "Argentina", "Argentina"),
    country("AU", "Austrália", "Australia"),
    country("AT", "Áustria", "Austria"),
    country("BE", "Bélgica", "Belgium"),
    country("BO", "Bolívia", "Bolivia"),
    country("BR", "Brasil", "Brazil"),
    country("CA", "Canadá", "Canada"),
    country("CL", "Chile", "Chile"),
    country("CN", "China", "China"),
    country("CO", "Colômbia", "Colombia"),
    country("DE", "Alemanha", "Germany"),
    country("DK", "Dinamarca", "Denmark"),
    country("EC", "Equador", "Ecuador"),
    country("ES", "Espanha", "Spain"),
    country("FI", "Finlândia", "Finland"),
    country("FR", "França", "France"),
    country("GB", "Reino Unido", "United Kingdom"),
    country("IE", "Irlanda", "Ireland"),
    country("IN", "Índia", "India"),
    country("IT", "Itália", "Italy"),
    country("JP", "Japão", "Japan"),
    country("KR", "Coreia do Sul", "South Korea"),
    country("MX", "México", "Mexico"),
    country("NL", "Países Baixos", "Netherlands"),
    country("NO", "Noruega", "Norway"),
    country("NZ", "Nova Zelândia", "New Zealand"),
    country("PE", "Peru", "Peru"),
    country("PT", "Portugal", "Portugal"),
    country("PY", "Paraguai", "Paraguay"),
    country("SE", "Suécia", "Sweden"),
    country("CH", "Suíça", "Switzerland"),
    country("US", "Estados Unidos", "United States"),
    country("UY", "Uruguai", "Uruguay"),
    country("VE", "Venezuela", "Venezuela"),
    country("ZA", "África do Sul", "South Africa"),
];

/// Look up a country by its ISO code (case-insensitive).
pub fn find_country(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let pt = find_country("pt").unwrap();
        assert_eq!(pt.pt, "Portugal");
        assert_eq!(find_country("US").unwrap().en, "United States");
    }

    #[test]
    fn unknown_code() {
        assert!(find_country("XX").is_none());
    }

    #[test]
    fn codes_are_unique() {
        for (i, a) in COUNTRIES.iter().enumerate() {
            assert!(COUNTRIES[i + 1..].iter().all(|b| b.code != a.code), "{}", a.code);
        }
    }
}

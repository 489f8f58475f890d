//! 只读目录：机构与司法区

use serde::Deserialize;

/// 机构（`/api/v5/autoridades`）
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Authority {
    pub clave: String,
    #[serde(default)]
    pub descripcion_corta: Option<String>,
    #[serde(default)]
    pub es_notaria: Option<bool>,
}

/// 司法区（`/api/v5/distritos`）
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct District {
    pub clave: String,
    #[serde(default)]
    pub nombre_corto: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub es_jurisdiccional: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authority_tolerates_nulls_and_extra_fields() {
        let authority: Authority = serde_json::from_value(serde_json::json!({
            "id": 12,
            "clave": "SLT-J2-CIV",
            "descripcion_corta": null,
            "es_notaria": false,
            "directorio_edictos": "Saltillo/Juzgado Segundo Civil"
        }))
        .unwrap();

        assert_eq!(authority.clave, "SLT-J2-CIV");
        assert_eq!(authority.descripcion_corta, None);
        assert_eq!(authority.es_notaria, Some(false));
    }

    #[test]
    fn district_without_flags() {
        let district: District = serde_json::from_value(serde_json::json!({
            "clave": "DSLT",
            "nombre_corto": "Saltillo",
            "nombre": "DISTRITO JUDICIAL DE SALTILLO"
        }))
        .unwrap();

        assert_eq!(district.nombre_corto.as_deref(), Some("Saltillo"));
        assert_eq!(district.es_jurisdiccional, None);
    }
}

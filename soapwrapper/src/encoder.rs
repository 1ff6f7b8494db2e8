//! Mise en forme des paramètres d'appel
//!
//! [`encode_params`] prépare une valeur pour [`Wrapper::call`](crate::Wrapper::call)
//! en fonction de sa forme :
//!
//! - objet : séquence à un élément contenant une [`SoapVar`] de type
//!   `SOAP-ENC:Struct` dont le nœud porte le nom du paramètre ;
//! - tableau ou tableau associatif : inchangé ;
//! - scalaire : `{name: value}`.

use soapclient::{Encoding, SoapValue, SoapVar, ValueKind};

/// Encodes `value` as the parameters of a single SOAP argument named `name`
pub fn encode_params(value: impl Into<SoapValue>, name: &str) -> SoapValue {
    let value = value.into();

    match value.kind() {
        ValueKind::Object => SoapValue::Array(vec![object_var(value, name)]),
        ValueKind::Collection => value,
        ValueKind::Scalar => SoapValue::Map(vec![(name.to_string(), value)]),
    }
}

fn object_var(value: SoapValue, name: &str) -> SoapValue {
    match value {
        // Déjà typée : on ne fait que nommer le nœud s'il ne l'est pas
        SoapValue::Var(mut var) => {
            if var.node_name.is_none() && !name.is_empty() {
                var.node_name = Some(name.to_string());
            }
            SoapValue::Var(var)
        }
        object => SoapVar::new(object, Encoding::Object)
            .with_node(name, None)
            .into(),
    }
}

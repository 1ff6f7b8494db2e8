//! Modèle de valeurs SOAP
//!
//! [`SoapValue`] représente aussi bien les paramètres d'un appel que les
//! valeurs décodées d'une réponse. Les trois familles de valeurs
//! (scalaires, collections, objets) sont exposées par [`ValueKind`].

use crate::var::SoapVar;

/// Famille d'une [`SoapValue`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `Null`, booléens, nombres et chaînes
    Scalar,
    /// Séquences et tableaux associatifs
    Collection,
    /// Objets structurés et variables typées
    Object,
}

/// Objet structuré : nom de type optionnel et champs ordonnés
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoapObject {
    /// Nom du type (ex: "GetQuoteRequest"), utilisé comme `xsi:type` si présent
    pub class: Option<String>,

    /// Champs de l'objet, dans l'ordre d'émission
    pub fields: Vec<(String, SoapValue)>,
}

impl SoapObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(class: &str) -> Self {
        Self {
            class: Some(class.to_string()),
            fields: Vec::new(),
        }
    }

    /// Ajoute un champ (builder)
    pub fn field(mut self, name: &str, value: impl Into<SoapValue>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&SoapValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }
}

/// Valeur transportée dans une enveloppe SOAP
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SoapValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Séquence positionnelle
    Array(Vec<SoapValue>),
    /// Tableau associatif ordonné
    Map(Vec<(String, SoapValue)>),
    Object(SoapObject),
    /// Valeur annotée d'un type explicite
    Var(Box<SoapVar>),
}

impl SoapValue {
    /// Construit un tableau associatif à partir de paires
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<SoapValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        SoapValue::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            SoapValue::Null
            | SoapValue::Bool(_)
            | SoapValue::Int(_)
            | SoapValue::Float(_)
            | SoapValue::String(_) => ValueKind::Scalar,
            SoapValue::Array(_) | SoapValue::Map(_) => ValueKind::Collection,
            SoapValue::Object(_) | SoapValue::Var(_) => ValueKind::Object,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SoapValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SoapValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[SoapValue]> {
        match self {
            SoapValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Accès par clé pour les `Map` et les `Object`
    pub fn get(&self, key: &str) -> Option<&SoapValue> {
        match self {
            SoapValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            SoapValue::Object(obj) => obj.get(key),
            _ => None,
        }
    }

    /// Représentation textuelle d'un scalaire, telle qu'émise dans le XML
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            SoapValue::Bool(b) => Some(b.to_string()),
            SoapValue::Int(i) => Some(i.to_string()),
            SoapValue::Float(f) => Some(float_text(*f)),
            SoapValue::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

/// Forme lexicale `xsd:double` (`INF`, `-INF`, `NaN` pour les non finis)
fn float_text(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "INF".to_string()
    } else if value == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        value.to_string()
    }
}

impl From<bool> for SoapValue {
    fn from(value: bool) -> Self {
        SoapValue::Bool(value)
    }
}

impl From<i32> for SoapValue {
    fn from(value: i32) -> Self {
        SoapValue::Int(i64::from(value))
    }
}

impl From<i64> for SoapValue {
    fn from(value: i64) -> Self {
        SoapValue::Int(value)
    }
}

impl From<u32> for SoapValue {
    fn from(value: u32) -> Self {
        SoapValue::Int(i64::from(value))
    }
}

impl From<f64> for SoapValue {
    fn from(value: f64) -> Self {
        SoapValue::Float(value)
    }
}

impl From<&str> for SoapValue {
    fn from(value: &str) -> Self {
        SoapValue::String(value.to_string())
    }
}

impl From<String> for SoapValue {
    fn from(value: String) -> Self {
        SoapValue::String(value)
    }
}

impl From<SoapObject> for SoapValue {
    fn from(value: SoapObject) -> Self {
        SoapValue::Object(value)
    }
}

impl From<SoapVar> for SoapValue {
    fn from(value: SoapVar) -> Self {
        SoapValue::Var(Box::new(value))
    }
}

impl<T: Into<SoapValue>> From<Vec<T>> for SoapValue {
    fn from(values: Vec<T>) -> Self {
        SoapValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<SoapValue>> From<Option<T>> for SoapValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SoapValue::Null)
    }
}

//! Variables typées
//!
//! Une [`SoapVar`] force l'encodage d'une valeur quand le type ne peut pas
//! être déduit du WSDL (types complexes mal décrits par le XSD, services
//! .NET, etc.).

use crate::value::SoapValue;

pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
pub const SOAP_ENC_NS: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// Encodage demandé pour une variable typée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Structure : chaque champ devient un élément enfant
    Object,
    /// Tableau SOAP-ENC
    Array,
    String,
    Int,
    Float,
    Boolean,
    /// Aucun `xsi:type` n'est émis
    Any,
}

impl Encoding {
    /// Valeur de `xsi:type` par défaut pour cet encodage
    pub fn xsi_type(&self) -> Option<&'static str> {
        match self {
            Encoding::Object => Some("SOAP-ENC:Struct"),
            Encoding::Array => Some("SOAP-ENC:Array"),
            Encoding::String => Some("xsd:string"),
            Encoding::Int => Some("xsd:int"),
            Encoding::Float => Some("xsd:float"),
            Encoding::Boolean => Some("xsd:boolean"),
            Encoding::Any => None,
        }
    }
}

/// Valeur accompagnée d'un type et d'un nom de nœud explicites
#[derive(Debug, Clone, PartialEq)]
pub struct SoapVar {
    pub value: SoapValue,
    pub encoding: Encoding,

    /// Nom du type XSD (remplace le `xsi:type` par défaut de l'encodage)
    pub type_name: Option<String>,
    pub type_namespace: Option<String>,

    /// Nom de l'élément émis pour cette variable
    pub node_name: Option<String>,
    pub node_namespace: Option<String>,
}

impl SoapVar {
    pub fn new(value: impl Into<SoapValue>, encoding: Encoding) -> Self {
        Self {
            value: value.into(),
            encoding,
            type_name: None,
            type_namespace: None,
            node_name: None,
            node_namespace: None,
        }
    }

    /// Fixe le type XSD explicite
    pub fn with_type(mut self, name: &str, namespace: Option<&str>) -> Self {
        self.type_name = non_empty(name);
        self.type_namespace = namespace.and_then(non_empty);
        self
    }

    /// Fixe le nom (et le namespace) de l'élément émis
    pub fn with_node(mut self, name: &str, namespace: Option<&str>) -> Self {
        self.node_name = non_empty(name);
        self.node_namespace = namespace.and_then(non_empty);
        self
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

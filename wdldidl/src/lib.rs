//! # wdldidl - Modèle DIDL-Lite
//!
//! Structures et parser pour les documents DIDL-Lite renvoyés par l'action
//! `Browse` d'un service ContentDirectory (MiniDLNA et consorts).
//!
//! Tous les champs sont conservés tels quels, sous forme de texte : UPnP ne
//! garantit rien au-delà de "string". Les accesseurs typés (`size()`,
//! `duration()`, ...) tentent une conversion et retombent sur le texte brut
//! quand elle échoue, sans jamais rejeter l'enregistrement.

mod fields;

use serde::{Deserialize, Serialize};

pub use fields::{FieldValue, parse_didl_duration, parse_resolution};

// ============= Couche d'abstraction générique =============

/// Trait pour tout parser de métadonnées média
pub trait MediaMetadataParser: Sized {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parse une chaîne de métadonnées
    fn parse(input: &str) -> Result<Self, Self::Error>;
}

impl MediaMetadataParser for DIDLLite {
    type Error = quick_xml::de::DeError;

    fn parse(input: &str) -> Result<Self, Self::Error> {
        quick_xml::de::from_str(input)
    }

}

// ============= Structures DIDL-Lite =============

/// Racine d'un document DIDL-Lite
///
/// Pour un même `Browse`, containers et items sont disjoints ; l'ordre du
/// document est conservé dans chacune des deux séquences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename = "DIDL-Lite")]
pub struct DIDLLite {
    #[serde(rename = "container", default)]
    pub containers: Vec<Container>,

    #[serde(rename = "item", default)]
    pub items: Vec<Item>,
}

/// Container (dossier) situé un niveau sous son parent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(rename = "@id", default)]
    pub id: String,

    #[serde(rename = "@parentID", default)]
    pub parent_id: String,

    #[serde(rename = "@restricted", skip_serializing_if = "Option::is_none")]
    pub restricted: Option<String>,

    #[serde(rename = "@searchable", skip_serializing_if = "Option::is_none")]
    pub searchable: Option<String>,

    #[serde(rename = "@childCount", skip_serializing_if = "Option::is_none")]
    pub child_count: Option<String>,

    #[serde(rename = "dc:title", alias = "title", default)]
    pub title: String,

    #[serde(rename = "upnp:class", alias = "class", default)]
    pub class: String,

    #[serde(
        rename = "upnp:storageUsed",
        alias = "storageUsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub storage_used: Option<String>,
}

/// Item représentant un objet média (fichier audio, vidéo, image)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "@id", default)]
    pub id: String,

    #[serde(rename = "@parentID", default)]
    pub parent_id: String,

    #[serde(rename = "@restricted", skip_serializing_if = "Option::is_none")]
    pub restricted: Option<String>,

    #[serde(rename = "dc:title", alias = "title", default)]
    pub title: String,

    #[serde(rename = "upnp:class", alias = "class", default)]
    pub class: String,

    #[serde(
        rename = "dc:creator",
        alias = "creator",
        skip_serializing_if = "Option::is_none"
    )]
    pub creator: Option<String>,

    #[serde(
        rename = "dc:date",
        alias = "date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,

    #[serde(
        rename = "upnp:albumArtURI",
        alias = "albumArtURI",
        skip_serializing_if = "Option::is_none"
    )]
    pub album_art: Option<String>,

    /// Certains serveurs ajoutent des `<res>` secondaires (vignettes,
    /// sous-titres) : la ressource principale est la première.
    #[serde(rename = "res", default)]
    pub resources: Vec<Resource>,
}

/// Ressource média : URL et métadonnées techniques, toutes en texte brut
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "@protocolInfo", default)]
    pub protocol_info: String,

    #[serde(rename = "@size", skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    #[serde(rename = "@duration", skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(rename = "@bitrate", skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,

    #[serde(rename = "@sampleFrequency", skip_serializing_if = "Option::is_none")]
    pub sample_frequency: Option<String>,

    #[serde(rename = "@nrAudioChannels", skip_serializing_if = "Option::is_none")]
    pub nr_audio_channels: Option<String>,

    #[serde(rename = "@resolution", skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    #[serde(rename = "$text", default)]
    pub url: String,
}

// ============= Implémentation des méthodes =============

impl DIDLLite {
    /// Vrai si le document ne contient ni container ni item
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.items.is_empty()
    }
}

impl Container {
    /// Nombre d'enfants annoncé par le serveur
    pub fn child_count(&self) -> Option<FieldValue<u64>> {
        self.child_count.as_deref().map(FieldValue::parse)
    }

    /// Espace occupé en octets (`-1` signifie "inconnu" côté UPnP)
    pub fn storage_used(&self) -> Option<FieldValue<i64>> {
        self.storage_used.as_deref().map(FieldValue::parse)
    }
}

impl Item {
    /// Retourne la ressource principale (première disponible)
    pub fn primary_resource(&self) -> Option<&Resource> {
        self.resources.first()
    }

    /// URL de la pochette, sans le suffixe de redimensionnement `?width=`
    pub fn album_art_url(&self) -> Option<&str> {
        self.album_art.as_deref().map(strip_size)
    }
}

impl Resource {
    /// Taille en octets
    pub fn size(&self) -> Option<FieldValue<u64>> {
        self.size.as_deref().map(FieldValue::parse)
    }

    /// Durée au format DIDL `H+:MM:SS[.F+]`
    pub fn duration(&self) -> Option<FieldValue<std::time::Duration>> {
        self.duration
            .as_deref()
            .map(|raw| FieldValue::parse_with(raw, parse_didl_duration))
    }

    /// Débit en octets par seconde (unité DIDL)
    pub fn bitrate(&self) -> Option<FieldValue<u64>> {
        self.bitrate.as_deref().map(FieldValue::parse)
    }

    pub fn sample_frequency(&self) -> Option<FieldValue<u32>> {
        self.sample_frequency.as_deref().map(FieldValue::parse)
    }

    pub fn nr_audio_channels(&self) -> Option<FieldValue<u32>> {
        self.nr_audio_channels.as_deref().map(FieldValue::parse)
    }

    /// Résolution `LARGEURxHAUTEUR`
    pub fn resolution(&self) -> Option<FieldValue<(u32, u32)>> {
        self.resolution
            .as_deref()
            .map(|raw| FieldValue::parse_with(raw, parse_resolution))
    }

    /// Type MIME extrait du protocolInfo (`protocol:network:contentFormat:info`)
    pub fn mime_type(&self) -> Option<&str> {
        self.protocol_info
            .split(':')
            .nth(2)
            .map(str::trim)
            .filter(|mime| !mime.is_empty() && *mime != "*")
    }
}

/// Supprime le paramètre `?width=` qu'ajoutent certains serveurs aux URL d'images
pub fn strip_size(url: &str) -> &str {
    match url.split_once("?width=") {
        Some((before, _)) => before,
        None => url,
    }
}

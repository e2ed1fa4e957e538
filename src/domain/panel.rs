// Panel domain model
use bytes::Bytes;

#[derive(Debug, Clone, PartialEq)]
pub enum CurrentReading {
    Available {
        value_text: String,
        timestamp_text: String,
    },
    Unavailable {
        headline: String,
        detail: String,
    },
}

impl CurrentReading {
    pub fn headline(&self) -> &str {
        match self {
            CurrentReading::Available { value_text, .. } => value_text,
            CurrentReading::Unavailable { headline, .. } => headline,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            CurrentReading::Available { timestamp_text, .. } => timestamp_text,
            CurrentReading::Unavailable { detail, .. } => detail,
        }
    }
}

/// Everything a host needs to draw the panel
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: String,
    pub logo: Option<Bytes>,
    pub reading: CurrentReading,
    pub chart_png: Option<Vec<u8>>,
}

impl Panel {
    pub fn new(
        title: String,
        logo: Option<Bytes>,
        reading: CurrentReading,
        chart_png: Option<Vec<u8>>,
    ) -> Self {
        Self {
            title,
            logo,
            reading,
            chart_png,
        }
    }
}

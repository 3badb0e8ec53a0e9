use crate::domain::model::Centroid;

/// Curated Ortsteil centroids, grouped by Bezirk. The order matters: substring
/// fallback returns the first hit in this order.
const BERLIN_NEIGHBORHOODS: &[(&str, f64, f64)] = &[
    // Mitte
    ("Mitte", 52.5200, 13.4050),
    ("Tiergarten", 52.5147, 13.3507),
    ("Wedding", 52.5500, 13.3650),
    ("Gesundbrunnen", 52.5511, 13.3885),
    ("Moabit", 52.5280, 13.3430),
    // Friedrichshain-Kreuzberg
    ("Friedrichshain", 52.5159, 13.4533),
    ("Kreuzberg", 52.4987, 13.4030),
    // Pankow
    ("Prenzlauer Berg", 52.5409, 13.4134),
    ("Weißensee", 52.5547, 13.4774),
    ("Pankow", 52.5692, 13.4018),
    ("Buch", 52.6289, 13.4999),
    ("Französisch Buchholz", 52.6140, 13.4200),
    ("Karow", 52.6082, 13.4816),
    ("Wilhelmsruh", 52.5897, 13.4186),
    ("Rosenthal", 52.5944, 13.3778),
    ("Blankenfelde", 52.6033, 13.3889),
    ("Heinersdorf", 52.5755, 13.4456),
    ("Malchow", 52.5733, 13.4667),
    ("Wartenberg", 52.5667, 13.5167),
    ("Blankenburg", 52.5964, 13.4564),
    ("Niederschönhausen", 52.5756, 13.4000),
    // Charlottenburg-Wilmersdorf
    ("Charlottenburg", 52.5170, 13.3043),
    ("Wilmersdorf", 52.4867, 13.3189),
    ("Schmargendorf", 52.4667, 13.2833),
    ("Grunewald", 52.4833, 13.2667),
    ("Westend", 52.5167, 13.2833),
    ("Halensee", 52.4958, 13.3056),
    // Spandau
    ("Spandau", 52.5333, 13.2000),
    ("Hakenfelde", 52.5500, 13.1833),
    ("Gatow", 52.4833, 13.1833),
    ("Kladow", 52.4500, 13.1500),
    ("Staaken", 52.5333, 13.1333),
    ("Falkenhagener Feld", 52.5500, 13.1667),
    ("Wilhelmstadt", 52.5167, 13.1833),
    // Steglitz-Zehlendorf
    ("Steglitz", 52.4500, 13.3167),
    ("Zehlendorf", 52.4333, 13.2500),
    ("Wannsee", 52.4167, 13.1833),
    ("Nikolassee", 52.4167, 13.2167),
    ("Dahlem", 52.4667, 13.2833),
    ("Lichterfelde", 52.4333, 13.3000),
    ("Lankwitz", 52.4333, 13.3500),
    ("Mariendorf", 52.4333, 13.3833),
    ("Marienfelde", 52.4000, 13.3667),
    ("Lichtenrade", 52.3833, 13.4000),
    // Tempelhof-Schöneberg
    ("Tempelhof", 52.4500, 13.3833),
    ("Schöneberg", 52.4833, 13.3500),
    ("Friedenau", 52.4667, 13.3333),
    // Neukölln
    ("Neukölln", 52.4500, 13.4333),
    ("Britz", 52.4167, 13.4167),
    ("Buckow", 52.4167, 13.4333),
    ("Rudow", 52.4000, 13.4667),
    ("Gropiusstadt", 52.4000, 13.4333),
    // Treptow-Köpenick
    ("Treptow", 52.4833, 13.4667),
    ("Köpenick", 52.4333, 13.5667),
    ("Oberschöneweide", 52.4500, 13.5167),
    ("Niederschöneweide", 52.4333, 13.5000),
    ("Johannisthal", 52.4333, 13.5333),
    ("Adlershof", 52.4167, 13.5333),
    ("Altglienicke", 52.3833, 13.5333),
    ("Bohnsdorf", 52.3833, 13.5667),
    ("Grünau", 52.4000, 13.5833),
    ("Schmöckwitz", 52.3667, 13.6500),
    ("Friedrichshagen", 52.4333, 13.6167),
    ("Rahnsdorf", 52.4167, 13.6833),
    ("Hessenwinkel", 52.4167, 13.6167),
    ("Müggelheim", 52.3833, 13.6833),
    ("Wendenschloß", 52.4167, 13.6000),
    ("Plänterwald", 52.4833, 13.4833),
    ("Baumschulenweg", 52.4667, 13.5000),
    ("Späth", 52.4500, 13.5000),
    ("Schöneweide", 52.4500, 13.5167),
    ("Karlshorst", 52.4833, 13.5333),
    ("Köllnische Heide", 52.4167, 13.5000),
    // Marzahn-Hellersdorf
    ("Marzahn", 52.5333, 13.5500),
    ("Hellersdorf", 52.5167, 13.5833),
    ("Biesdorf", 52.5000, 13.5500),
    ("Kaulsdorf", 52.5167, 13.5833),
    ("Mahlsdorf", 52.5000, 13.6167),
    // Lichtenberg
    ("Lichtenberg", 52.5167, 13.5000),
    ("Friedrichsfelde", 52.5000, 13.5167),
    ("Rummelsburg", 52.5000, 13.4667),
    ("Fennpfuhl", 52.5333, 13.4833),
    ("Hohenschönhausen", 52.5500, 13.5000),
    ("Falkenberg", 52.5833, 13.5333),
    // Reinickendorf
    ("Reinickendorf", 52.5833, 13.3333),
    ("Tegel", 52.5833, 13.2833),
    ("Heiligensee", 52.6167, 13.2500),
    ("Frohnau", 52.6333, 13.3000),
    ("Hermsdorf", 52.6167, 13.3167),
    ("Waidmannslust", 52.6000, 13.3167),
    ("Lübars", 52.6167, 13.3667),
    ("Wittenau", 52.5833, 13.3333),
    ("Märkisches Viertel", 52.6000, 13.3833),
    ("Borsigwalde", 52.5833, 13.3000),
    ("Konradshöhe", 52.5833, 13.2500),
    ("Tegelort", 52.6000, 13.2667),
];

/// Coarse Bezirk centres, only used when a map marker has nothing better.
const BERLIN_DISTRICTS: &[(&str, f64, f64)] = &[
    ("Mitte", 52.520, 13.405),
    ("Friedrichshain-Kreuzberg", 52.515, 13.455),
    ("Charlottenburg-Wilmersdorf", 52.520, 13.295),
    ("Pankow", 52.565, 13.405),
    ("Neukölln", 52.475, 13.435),
    ("Tempelhof-Schöneberg", 52.485, 13.365),
    ("Reinickendorf", 52.585, 13.335),
    ("Steglitz-Zehlendorf", 52.435, 13.255),
    ("Marzahn-Hellersdorf", 52.535, 13.595),
    ("Spandau", 52.535, 13.195),
    ("Lichtenberg", 52.545, 13.485),
    ("Treptow-Köpenick", 52.455, 13.575),
    ("Friedrichshain", 52.515, 13.455),
    ("Kreuzberg", 52.500, 13.420),
    ("Charlottenburg", 52.520, 13.295),
    ("Wilmersdorf", 52.495, 13.315),
    ("Schöneberg", 52.485, 13.365),
    ("Tempelhof", 52.465, 13.385),
    ("Zehlendorf", 52.435, 13.255),
    ("Steglitz", 52.455, 13.315),
];

pub const BERLIN_CENTER: Centroid = Centroid::new(52.52, 13.405);

/// Immutable name → centroid lookup.
///
/// Lookup never fails: an unknown name yields `None`. Matching runs in three
/// passes over the declared order, first hit wins:
///
/// 1. exact string match
/// 2. case-insensitive match
/// 3. substring match in either direction (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct CoordinateTable {
    entries: Vec<(String, Centroid)>,
}

impl CoordinateTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Centroid)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, centroid)| (name.into(), centroid))
                .collect(),
        }
    }

    /// The curated Berlin Ortsteil table.
    pub fn berlin_neighborhoods() -> Self {
        Self::from_static(BERLIN_NEIGHBORHOODS)
    }

    pub fn berlin_districts() -> Self {
        Self::from_static(BERLIN_DISTRICTS)
    }

    fn from_static(rows: &[(&str, f64, f64)]) -> Self {
        Self::new(
            rows.iter()
                .map(|&(name, lat, lon)| (name, Centroid::new(lat, lon))),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Option<Centroid> {
        if let Some((_, centroid)) = self.entries.iter().find(|(key, _)| key == name) {
            return Some(*centroid);
        }

        let wanted = name.to_lowercase();
        if let Some((_, centroid)) = self
            .entries
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
        {
            return Some(*centroid);
        }

        self.entries
            .iter()
            .find(|(key, _)| {
                let key = key.to_lowercase();
                key.contains(&wanted) || wanted.contains(&key)
            })
            .map(|(_, centroid)| *centroid)
    }
}

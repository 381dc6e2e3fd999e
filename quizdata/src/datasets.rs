//! Static region definitions for every supported country.
//!
//! Each list pairs the color a region is painted with on the reference
//! bitmap with the region's display name. The lists are hand-maintained, so
//! `RegionTable::build` checks them against the expected region count.

use crate::color::KeyFormat;
use std::fmt;
use std::str::FromStr;

/// A country the quiz ships maps for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountryId {
    Mexico,
    Brazil,
    Japan,
    Philippines,
    Malaysia,
}

impl CountryId {
    /// Catalog order.
    pub const ALL: [CountryId; 5] = [
        CountryId::Mexico,
        CountryId::Brazil,
        CountryId::Japan,
        CountryId::Philippines,
        CountryId::Malaysia,
    ];

    /// File stem of the country's assets, e.g. `mexico-colored.png`.
    pub fn slug(self) -> &'static str {
        match self {
            CountryId::Mexico => "mexico",
            CountryId::Brazil => "brazil",
            CountryId::Japan => "japan",
            CountryId::Philippines => "philippines",
            CountryId::Malaysia => "malaysia",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CountryId::Mexico => "Mexico",
            CountryId::Brazil => "Brazil",
            CountryId::Japan => "Japan",
            CountryId::Philippines => "Philippines",
            CountryId::Malaysia => "Malaysia",
        }
    }

    pub fn expected_regions(self) -> usize {
        match self {
            CountryId::Mexico => 32,
            CountryId::Brazil => 27,
            CountryId::Japan => 47,
            CountryId::Philippines => 11,
            CountryId::Malaysia => 16,
        }
    }

    /// Mexico predates alpha-aware keys and is still keyed on RGB.
    pub fn key_format(self) -> KeyFormat {
        match self {
            CountryId::Mexico => KeyFormat::Rgb24,
            _ => KeyFormat::Rgba32,
        }
    }

    pub fn definitions(self) -> &'static [(u32, &'static str)] {
        match self {
            CountryId::Mexico => MEXICO,
            CountryId::Brazil => BRAZIL,
            CountryId::Japan => JAPAN,
            CountryId::Philippines => PHILIPPINES,
            CountryId::Malaysia => MALAYSIA,
        }
    }
}

impl fmt::Display for CountryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CountryId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CountryId::ALL
            .into_iter()
            .find(|c| c.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let known: Vec<_> = CountryId::ALL.iter().map(|c| c.slug()).collect();
                format!("unknown country '{}' (known: {})", s, known.join(", "))
            })
    }
}

// 24-bit keys (0xRRGGBB).
const MEXICO: &[(u32, &str)] = &[
    (0x00ffff, "Baja California"),
    (0x808080, "Baja California Sur"),
    (0x800000, "Sonora"),
    (0x808000, "Chihuahua"),
    (0x008000, "Coahuila"),
    (0x000080, "Nuevo Leon"),
    (0xff00ff, "Tamaulipas"),
    (0xff0000, "Sinaloa"),
    (0xffff00, "Durango"),
    (0x00ff00, "Zacatecas"),
    (0x0000ff, "San Luis Potosi"),
    (0x6bd4bf, "Veracruz"),
    (0x008080, "Nayarit"),
    (0xe94f37, "Jalisco"),
    (0x004040, "Colima"),
    (0x808040, "Michoacan"),
    (0x80ffff, "Guerrero"),
    (0xb04f89, "Oaxaca"),
    (0x2d534e, "Chiapas"),
    (0x9a83bc, "Tabasco"),
    (0x804000, "Puebla"),
    (0xb18e93, "Campeche"),
    (0xd2bead, "Yucatan"),
    (0xf4948b, "Quintana Roo"),
    (0xff0080, "Mexico City"),
    (0xffff80, "Aguascalientes"),
    (0x800080, "Guanajuato"),
    (0x0080ff, "Queretaro"),
    (0x004080, "Hidalgo"),
    (0x00ff80, "State of Mexico"),
    (0x4000ff, "Morelos"),
    (0xff8040, "Tlaxcala"),
];

// 32-bit keys (0xRRGGBBAA) from here on.
const BRAZIL: &[(u32, &str)] = &[
    (0xf22424ff, "Acre"),
    (0xbf411dff, "Alagoas"),
    (0x8c4a15ff, "Amapa"),
    (0xf2be55ff, "Amazonas"),
    (0xbfb143ff, "Bahia"),
    (0x828c31ff, "Ceara"),
    (0xaef224ff, "Federal District"),
    (0x65bf1dff, "Espirito Santo"),
    (0x308c15ff, "Goias"),
    (0x55f255ff, "Maranhao"),
    (0x43bf5fff, "Mato Grosso"),
    (0x318c5aff, "Mato Grosso do Sul"),
    (0x24f2aeff, "Minas Gerais"),
    (0x1dbfadff, "Para"),
    (0x157f8cff, "Paraiba"),
    (0x55bef2ff, "Parana"),
    (0x437abfff, "Pernambuco"),
    (0x31458cff, "Piaui"),
    (0x2424f2ff, "Rio de Janeiro"),
    (0x411dbfff, "Rio Grande do Norte"),
    (0x4a158cff, "Rio Grande do Sul"),
    (0xbe55f2ff, "Rondonia"),
    (0xb143bfff, "Roraima"),
    (0x8c3182ff, "Santa Catarina"),
    (0xf224aeff, "Sao Paulo"),
    (0xbf1d65ff, "Sergipe"),
    (0x8c1530ff, "Tocantins"),
];

const JAPAN: &[(u32, &str)] = &[
    (0xf25224ff, "Hokkaido"),
    (0xbf561dff, "Aomori"),
    (0x8c4e15ff, "Iwate"),
    (0xf2b455ff, "Miyagi"),
    (0xbf9e43ff, "Akita"),
    (0x8c8031ff, "Yamagata"),
    (0xf2f024ff, "Fukushima"),
    (0xacbf1dff, "Ibaraki"),
    (0x6f8c15ff, "Tochigi"),
    (0xb8f255ff, "Gunma"),
    (0x81bf43ff, "Saitama"),
    (0x538c31ff, "Chiba"),
    (0x57f224ff, "Tokyo"),
    (0x30bf1dff, "Kanagawa"),
    (0x158c16ff, "Niigata"),
    (0x55f26aff, "Toyama"),
    (0x43bf64ff, "Ishikawa"),
    (0x318c55ff, "Fukui"),
    (0x24f28fff, "Yamanashi"),
    (0x1dbf86ff, "Nagano"),
    (0x158c71ff, "Gifu"),
    (0x55f2e3ff, "Shizuoka"),
    (0x43bbbfff, "Aichi"),
    (0x317e8cff, "Mie"),
    (0x24b7f2ff, "Shiga"),
    (0x1d7cbfff, "Kyoto"),
    (0x154c8cff, "Osaka"),
    (0x5589f2ff, "Hyogo"),
    (0x435cbfff, "Nara"),
    (0x31388cff, "Wakayama"),
    (0x2f24f2ff, "Tottori"),
    (0x3a1dbfff, "Shimane"),
    (0x3a158cff, "Okayama"),
    (0x9955f2ff, "Hiroshima"),
    (0x8943bfff, "Yamaguchi"),
    (0x70318cff, "Tokushima"),
    (0xcd24f2ff, "Kagawa"),
    (0xb61dbfff, "Ehime"),
    (0x8c1584ff, "Kochi"),
    (0xf255d3ff, "Fukuoka"),
    (0xbf4396ff, "Saga"),
    (0x8c3163ff, "Nagasaki"),
    (0xf2247aff, "Kumamoto"),
    (0xbf1d4cff, "Oita"),
    (0x8c1528ff, "Miyazaki"),
    (0xf2555aff, "Kagoshima"),
    (0xbf4f43ff, "Okinawa"),
];

const PHILIPPINES: &[(u32, &str)] = &[
    (0xf28024ff, "Luzon"),
    (0xbfbe1dff, "Mindanao"),
    (0x4c8c15ff, "Samar"),
    (0x55f261ff, "Negros"),
    (0x43bf91ff, "Palawan"),
    (0x317d8cff, "Panay"),
    (0x245ff2ff, "Mindoro"),
    (0x471dbfff, "Leyte"),
    (0x75158cff, "Cebu"),
    (0xf255bbff, "Bohol"),
    (0xbf4350ff, "Masbate"),
];

const MALAYSIA: &[(u32, &str)] = &[
    (0xf2ad24ff, "Johor"),
    (0xb9bf1dff, "Kedah"),
    (0x5b8c15ff, "Kelantan"),
    (0x76f255ff, "Malacca"),
    (0x43bf58ff, "Negeri Sembilan"),
    (0x318c62ff, "Pahang"),
    (0x24f2e1ff, "Penang"),
    (0x1d90bfff, "Perak"),
    (0x153d8cff, "Perlis"),
    (0x5b55f2ff, "Sabah"),
    (0x7743bfff, "Sarawak"),
    (0x79318cff, "Selangor"),
    (0xf224d0ff, "Terengganu"),
    (0xbf1d67ff, "Kuala Lumpur"),
    (0x8c151fff, "Labuan"),
    (0xf28355ff, "Putrajaya"),
];

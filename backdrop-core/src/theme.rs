/// Theme colors and a parser for stylesheet custom properties
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_until, take_while1, take_while_m_n},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map},
    sequence::{delimited, preceded, separated_pair},
    IResult,
};
use thiserror::Error;

/// Errors raised while resolving theme colors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("invalid color literal `{0}`")]
    InvalidColor(String),
    #[error("custom property `{0}` not found in stylesheet")]
    MissingToken(String),
}

/// sRGB color with components in 0..=1 (byte value / 255, not linearized)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rgb` or `#rrggbb`
    pub fn from_hex(literal: &str) -> Result<Self, ThemeError> {
        match all_consuming(hex_color)(literal.trim()) {
            Ok((_, color)) => Ok(color),
            Err(_) => Err(ThemeError::InvalidColor(literal.to_string())),
        }
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (channel(self.r), channel(self.g), channel(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Background and accent colors of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub accent: Color,
}

impl Theme {
    pub fn from_hex(background: &str, accent: &str) -> Result<Self, ThemeError> {
        Ok(Self {
            background: Color::from_hex(background)?,
            accent: Color::from_hex(accent)?,
        })
    }

    /// Resolve both colors from custom properties declared in a stylesheet,
    /// e.g. `--bg-navy: #0a192f;`
    pub fn from_css(css: &str, background_token: &str, accent_token: &str) -> Result<Self, ThemeError> {
        let properties = custom_properties(css);
        let lookup = |token: &str| {
            let name = token.trim_start_matches("--");
            properties
                .iter()
                .rev()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .ok_or_else(|| ThemeError::MissingToken(token.to_string()))
        };

        Ok(Self {
            background: Color::from_hex(lookup(background_token)?)?,
            accent: Color::from_hex(lookup(accent_token)?)?,
        })
    }
}

fn hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn hex_color(input: &str) -> IResult<&str, Color> {
    preceded(
        char('#'),
        alt((
            map(take_while_m_n(6, 6, hex_digit), |digits: &str| {
                let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
                Color::from_rgb8(byte(0), byte(2), byte(4))
            }),
            map(take_while_m_n(3, 3, hex_digit), |digits: &str| {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).unwrap_or(0) * 17;
                Color::from_rgb8(nibble(0), nibble(1), nibble(2))
            }),
        )),
    )(input)
}

fn property_name(input: &str) -> IResult<&str, &str> {
    preceded(
        tag("--"),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
    )(input)
}

fn custom_property(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        separated_pair(
            property_name,
            delimited(multispace0, char(':'), multispace0),
            take_till(|c: char| c == ';' || c == '}'),
        ),
        |(name, value): (&str, &str)| (name, value.trim()),
    )(input)
}

/// Collect every `--name: value` declaration in document order.
///
/// Usages such as `var(--name)` are skipped because no colon follows them.
pub fn custom_properties(css: &str) -> Vec<(&str, &str)> {
    let mut properties = Vec::new();
    let mut rest = css;

    while let Ok((candidate, _)) = take_until::<_, _, nom::error::Error<&str>>("--")(rest) {
        match custom_property(candidate) {
            Ok((next, property)) => {
                properties.push(property);
                rest = next;
            }
            Err(_) => rest = &candidate[2..],
        }
    }

    properties
}

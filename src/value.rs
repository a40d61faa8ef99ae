//! On-demand evaluation of declaration values.
//!
//! Values are interpreted lazily, after parsing: as plain strings, as
//! integers with `pt`/`px`/`%` unit markers stripped, or as packed
//! `0xRRGGBB` colors. Two functions are defined: `url(...)` passes its
//! first argument through as a string, and `saturation(color, percent)`
//! desaturates and darkens a color via an integer HSB round trip.

use crate::error::{Error, Result};
use crate::model::{Rule, RuleValue, RuleValueKind};

impl RuleValue {
    /// Evaluate as a string. For functions, only `url` is defined.
    pub fn as_string(&self) -> Result<String> {
        let name = self.name();
        if self.kind == RuleValueKind::Function {
            match name.as_str() {
                "url" => match self.args.first() {
                    Some(arg) => arg.as_string(),
                    None => Err(Error::Arity("url")),
                },
                _ => Err(Error::UndefinedFunction(name)),
            }
        } else {
            Ok(name)
        }
    }

    /// Evaluate as a base-10 integer, stripping a unit suffix.
    ///
    /// The value is truncated at the first `p` (covering `pt` and `px`)
    /// and at a `%` marker, so `10px`, `12pt`, and `-36%` all parse.
    pub fn as_int(&self) -> Result<i32> {
        let name = self.name();
        let mut digits = name.as_str();
        if let Some(i) = digits.find('p') {
            digits = &digits[..i];
        }
        if let Some(i) = digits.find('%') {
            digits = &digits[..i];
        }
        digits
            .parse::<i32>()
            .map_err(|_| Error::InvalidNumber(name.clone()))
    }

    /// Evaluate as a 24-bit packed RGB color.
    ///
    /// Identifier values are parsed as base-16 (the leading `#` was already
    /// stripped during parsing). For functions, only `saturation` is
    /// defined.
    pub fn as_color(&self) -> Result<u32> {
        let name = self.name();
        if self.kind == RuleValueKind::Function {
            match name.as_str() {
                "saturation" => saturation(&self.args),
                _ => Err(Error::UndefinedFunction(name)),
            }
        } else {
            u32::from_str_radix(&name, 16).map_err(|_| Error::InvalidNumber(name.clone()))
        }
    }
}

impl Rule {
    fn first_value(&self) -> Result<&RuleValue> {
        self.values.first().ok_or(Error::MissingValue)
    }

    /// Evaluate the first value component as a string.
    pub fn value(&self) -> Result<String> {
        self.first_value()?.as_string()
    }

    /// Evaluate the first value component as an integer.
    pub fn value_int(&self) -> Result<i32> {
        self.first_value()?.as_int()
    }

    /// Evaluate the first value component as a packed RGB color.
    pub fn value_color(&self) -> Result<u32> {
        self.first_value()?.as_color()
    }
}

/// `saturation(color, percent)`: reduce saturation and brightness by
/// `255 * percent / 100` each (clamped at zero), leaving hue alone.
/// All arithmetic is integer; the output is bit-exact with the original
/// implementation this grammar came from.
fn saturation(args: &[RuleValue]) -> Result<u32> {
    if args.len() != 2 {
        return Err(Error::Arity("saturation"));
    }

    let rgb = args[0].as_color()?;
    let percent = args[1].as_int()?;

    let (hue, mut saturation, mut brightness) = rgb_to_hsb(rgb);

    if percent != 0 {
        let cut = 255 * percent / 100;
        saturation = (saturation - cut).max(0);
        brightness = (brightness - cut).max(0);
    }

    Ok(hsb_to_rgb(hue, saturation, brightness))
}

/// RGB to integer HSB, every channel scaled to 0-255.
///
/// Hue is computed on an intermediate 0-1535 scale (256 per hextant, keyed
/// by which channel is the maximum) and divided down by 6.
fn rgb_to_hsb(rgb: u32) -> (i32, i32, i32) {
    let blue = (rgb & 0x0000ff) as i32;
    let green = ((rgb & 0x00ff00) >> 8) as i32;
    let red = ((rgb & 0xff0000) >> 16) as i32;

    let (max, min) = if red > green {
        (red.max(blue), green.min(blue))
    } else {
        (green.max(blue), red.min(blue))
    };
    let delta = max - min;

    let brightness = max;
    let saturation = if max != 0 { delta * 255 / max } else { 0 };

    let mut hue = if saturation == 0 {
        0
    } else if red == max {
        (green - blue) * 255 / delta
    } else if green == max {
        512 + (blue - red) * 255 / delta
    } else {
        1024 + (red - green) * 255 / delta
    };
    if hue < 0 {
        hue += 1536;
    }
    hue /= 6;

    (hue, saturation, brightness)
}

/// Integer HSB back to packed RGB via hextant reconstruction.
fn hsb_to_rgb(hue: i32, saturation: i32, brightness: i32) -> u32 {
    let brightness = brightness.clamp(0, 255);

    let quad = (hue * 6) >> 8;
    let fract = (hue * 6) & 255;

    let m1 = brightness * (255 - saturation) / 255;
    let m2 = brightness * (255 - ((saturation * fract) >> 8)) / 255;
    let m3 = brightness * (255 - ((saturation * (256 - fract)) >> 8)) / 255;

    let (red, green, blue) = match quad {
        0 => (brightness, m3, m1),
        1 => (m2, brightness, m1),
        2 => (m1, brightness, m3),
        3 => (m1, m2, brightness),
        4 => (m3, m1, brightness),
        5 => (brightness, m1, m2),
        _ => (0, 0, 0),
    };

    ((red as u32) << 16) + ((green as u32) << 8) + blue as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, args: Vec<RuleValue>) -> RuleValue {
        let mut value = RuleValue::identifier(name);
        value.kind = RuleValueKind::Function;
        value.args = args;
        value
    }

    #[test]
    fn test_as_int_strips_units() {
        assert_eq!(RuleValue::identifier("10px").as_int().unwrap(), 10);
        assert_eq!(RuleValue::identifier("12pt").as_int().unwrap(), 12);
        assert_eq!(RuleValue::identifier("100%").as_int().unwrap(), 100);
        assert_eq!(RuleValue::identifier("-36%").as_int().unwrap(), -36);
        assert_eq!(RuleValue::identifier("7").as_int().unwrap(), 7);
    }

    #[test]
    fn test_as_int_rejects_non_numeric() {
        assert!(matches!(
            RuleValue::identifier("bold").as_int(),
            Err(Error::InvalidNumber(_))
        ));
        assert!(matches!(
            RuleValue::identifier("1.15").as_int(),
            Err(Error::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_as_color_parses_hex() {
        assert_eq!(RuleValue::identifier("#8f9091").as_color().unwrap(), 0x8f9091);
        assert_eq!(RuleValue::identifier("ff0000").as_color().unwrap(), 0xff0000);
    }

    #[test]
    fn test_url_passes_through_first_argument() {
        let url = function("url", vec![RuleValue::string("img/bg.png")]);
        assert_eq!(url.as_string().unwrap(), "img/bg.png");
    }

    #[test]
    fn test_url_with_no_argument_is_arity_error() {
        let url = function("url", vec![]);
        assert_eq!(url.as_string(), Err(Error::Arity("url")));
    }

    #[test]
    fn test_undefined_function() {
        let unknown = function("unknown", vec![RuleValue::identifier("x")]);
        assert_eq!(
            unknown.as_string(),
            Err(Error::UndefinedFunction("unknown".to_string()))
        );
        // Full-name dispatch: sharing a first letter with a defined
        // function is not enough.
        let scale = function("scale", vec![RuleValue::identifier("x")]);
        assert_eq!(
            scale.as_color(),
            Err(Error::UndefinedFunction("scale".to_string()))
        );
    }

    #[test]
    fn test_saturation_zero_percent_is_identity() {
        // Colors whose hue survives the integer /6 in rgb_to_hsb.
        for &color in &[0x000000, 0xffffff, 0xff0000, 0x8f9091, 0x123456] {
            let value = function(
                "saturation",
                vec![
                    RuleValue::identifier(&format!("{color:06x}")),
                    RuleValue::identifier("0%"),
                ],
            );
            assert_eq!(value.as_color().unwrap(), color, "color {color:06x}");
        }
    }

    #[test]
    fn test_saturation_zero_percent_loses_truncated_hue() {
        // 0x00ff80 has intermediate hue 640; 640 / 6 truncates, so the
        // round trip lands on a neighboring hue. The lossy division is
        // part of the original integer math and stays.
        let value = function(
            "saturation",
            vec![
                RuleValue::identifier("00ff80"),
                RuleValue::identifier("0%"),
            ],
        );
        assert_eq!(value.as_color().unwrap(), 0x00ff7c);
    }

    #[test]
    fn test_saturation_desaturates_and_darkens() {
        let value = function(
            "saturation",
            vec![
                RuleValue::identifier("#ffffff"),
                RuleValue::identifier("40%"),
            ],
        );
        assert_eq!(value.as_color().unwrap(), 0x999999);

        let value = function(
            "saturation",
            vec![
                RuleValue::identifier("#ff0000"),
                RuleValue::identifier("50%"),
            ],
        );
        assert_eq!(value.as_color().unwrap(), 0x803f3f);
    }

    #[test]
    fn test_saturation_clamps_at_black() {
        let value = function(
            "saturation",
            vec![
                RuleValue::identifier("#102030"),
                RuleValue::identifier("100%"),
            ],
        );
        assert_eq!(value.as_color().unwrap(), 0x000000);
    }

    #[test]
    fn test_saturation_wrong_arity() {
        let value = function("saturation", vec![RuleValue::identifier("#ffffff")]);
        assert_eq!(value.as_color(), Err(Error::Arity("saturation")));
        assert_eq!(
            value.as_color().unwrap_err().to_string(),
            "incorrect # of arguments for saturation()"
        );
    }

    #[test]
    fn test_rule_first_value_helpers() {
        let rule = Rule {
            name: "color".to_string(),
            values: vec![RuleValue::identifier("#336699")],
        };
        assert_eq!(rule.value().unwrap(), "336699");
        assert_eq!(rule.value_color().unwrap(), 0x336699);

        let empty = Rule {
            name: "color".to_string(),
            values: vec![],
        };
        assert_eq!(empty.value(), Err(Error::MissingValue));
    }
}

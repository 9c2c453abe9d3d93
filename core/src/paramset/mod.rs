//! Parameter Sets

use crate::base::*;
use crate::geometry::*;
use crate::spectrum::*;
use std::collections::HashMap;
use std::fmt;

/// A hashmap of parameters stored by name.
pub type ParamSetMap<T> = HashMap<String, T>;

/// Named, typed construction parameters for scene objects.
#[derive(Clone, Default)]
pub struct ParamSet {
    pub bools: ParamSetMap<bool>,
    pub ints: ParamSetMap<i32>,
    pub floats: ParamSetMap<Float>,
    pub point3fs: ParamSetMap<Point3f>,
    pub vector3fs: ParamSetMap<Vector3f>,
    pub spectra: ParamSetMap<Spectrum>,
    pub strings: ParamSetMap<String>,
}

/// Define a macro that can be used to generate functions for adding/replacing
/// a parameter, either in place or in builder style.
macro_rules! paramset_add {
    ($add: ident, $with: ident, $t: ty, $paramset: ident) => {
        pub fn $add(&mut self, name: &str, value: $t) {
            self.$paramset.insert(String::from(name), value);
        }

        pub fn $with(mut self, name: &str, value: $t) -> Self {
            self.$add(name, value);
            self
        }
    };
}

/// Define a macro that can be used to generate a function for finding
/// a parameter with a default.
macro_rules! paramset_find_one {
    ($func: ident, $t: ty, $paramset: ident) => {
        pub fn $func(&self, name: &str, default: $t) -> $t {
            match self.$paramset.get(name) {
                Some(value) => value.clone(),
                None => default,
            }
        }
    };
}

impl ParamSet {
    /// Returns a new `ParamSet`.
    pub fn new() -> Self {
        Self::default()
    }

    paramset_find_one!(find_one_bool, bool, bools);
    paramset_add!(add_bool, with_bool, bool, bools);

    paramset_find_one!(find_one_int, i32, ints);
    paramset_add!(add_int, with_int, i32, ints);

    paramset_find_one!(find_one_float, Float, floats);
    paramset_add!(add_float, with_float, Float, floats);

    paramset_find_one!(find_one_point3f, Point3f, point3fs);
    paramset_add!(add_point3f, with_point3f, Point3f, point3fs);

    paramset_find_one!(find_one_vector3f, Vector3f, vector3fs);
    paramset_add!(add_vector3f, with_vector3f, Vector3f, vector3fs);

    paramset_find_one!(find_one_spectrum, Spectrum, spectra);
    paramset_add!(add_spectrum, with_spectrum, Spectrum, spectra);

    paramset_find_one!(find_one_string, String, strings);
    paramset_add!(add_string, with_string, String, strings);

    /// Find a float that must be strictly positive. Missing or invalid values
    /// yield the default; invalid ones are reported.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_positive_float(&self, name: &str, default: Float) -> Float {
        let v = self.find_one_float(name, default);
        if v > 0.0 && v.is_finite() {
            v
        } else {
            warn!("Parameter '{name}' must be positive, got {v}. Using {default}.");
            default
        }
    }

    /// Find a non-negative integer count. Missing or invalid values yield the
    /// default; invalid ones are reported.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_count(&self, name: &str, default: usize) -> usize {
        let v = self.find_one_int(name, default as i32);
        if v >= 0 {
            v as usize
        } else {
            warn!("Parameter '{name}' must not be negative, got {v}. Using {default}.");
            default
        }
    }

    /// Find a spectrum that must be valid (finite, non-negative). Invalid
    /// values yield the default and are reported.
    ///
    /// * `name`    - Parameter name.
    /// * `default` - Default value.
    pub fn find_one_valid_spectrum(&self, name: &str, default: Spectrum) -> Spectrum {
        let v = self.find_one_spectrum(name, default);
        if v.is_valid() {
            v
        } else {
            warn!("Parameter '{name}' is not a valid colour: {v}. Using {default}.");
            default
        }
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.bools.is_empty()
            && self.ints.is_empty()
            && self.floats.is_empty()
            && self.point3fs.is_empty()
            && self.vector3fs.is_empty()
            && self.spectra.is_empty()
            && self.strings.is_empty()
    }
}

/// Define a macro that can be used to print parameters.
macro_rules! display_param {
    ($params: expr, $param_type: literal, $formatter: expr) => {
        for (name, value) in $params.iter() {
            writeln!($formatter, "\"{} {}\" [{}]", $param_type, name, value)?;
        }
    };
}

impl fmt::Display for ParamSet {
    /// Formats the value using the given formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_param!(self.bools, "bool", f);
        display_param!(self.ints, "integer", f);
        display_param!(self.floats, "float", f);
        display_param!(self.point3fs, "point3", f);
        display_param!(self.vector3fs, "vector3", f);
        display_param!(self.spectra, "rgb", f);
        display_param!(self.strings, "string", f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_one_returns_value_or_default() {
        let p = ParamSet::new()
            .with_float("radius", 2.0)
            .with_string("name", String::from("ball"));
        assert_eq!(p.find_one_float("radius", 1.0), 2.0);
        assert_eq!(p.find_one_float("missing", 1.0), 1.0);
        assert_eq!(p.find_one_string("name", String::new()), "ball");
    }

    #[test]
    fn invalid_values_fall_back_to_default() {
        let p = ParamSet::new()
            .with_float("radius", -2.0)
            .with_int("spp", -4)
            .with_spectrum("albedo", Spectrum::rgb(0.5, Float::NAN, 0.5));
        assert_eq!(p.find_one_positive_float("radius", 1.0), 1.0);
        assert_eq!(p.find_one_count("spp", 16), 16);
        assert_eq!(
            p.find_one_valid_spectrum("albedo", Spectrum::new(0.5)),
            Spectrum::new(0.5)
        );
    }
}

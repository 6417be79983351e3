use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkloadError {
    #[error("layer {name}: mac count of in_c*h*w*out_c*k*k does not fit in 64 bits")]
    MacOverflow { name: String },
}

/// # Description
/// one convolution layer of the workload
/// * the mac count is derived from the shape once, in `new`
/// * a shape whose mac count overflows `u64` is rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConvLayer {
    name: String,
    in_c: u64,
    h: u64,
    w: u64,
    out_c: u64,
    k: u64,
    mac_ops: u64,
}

impl ConvLayer {
    pub fn new(
        name: &str,
        in_c: u64,
        h: u64,
        w: u64,
        out_c: u64,
        k: u64,
    ) -> Result<Self, WorkloadError> {
        let dims = [in_c, h, w, out_c, k, k];
        let mac_ops = if dims.contains(&0) {
            Some(0)
        } else {
            dims.iter().try_fold(1u64, |acc, &d| acc.checked_mul(d))
        };
        let mac_ops = mac_ops.ok_or_else(|| WorkloadError::MacOverflow {
            name: name.to_string(),
        })?;
        Ok(ConvLayer {
            name: name.to_string(),
            in_c,
            h,
            w,
            out_c,
            k,
            mac_ops,
        })
    }

    /// the single mac layer, `1x1x1x1` with a `1x1` kernel
    pub fn unit(name: &str) -> Self {
        ConvLayer {
            name: name.to_string(),
            in_c: 1,
            h: 1,
            w: 1,
            out_c: 1,
            k: 1,
            mac_ops: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn mac_ops(&self) -> u64 {
        self.mac_ops
    }
}

/// the layer entry of a settings file, `repeat` copies of the same shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSettings {
    pub name: String,
    pub in_c: u64,
    pub h: u64,
    pub w: u64,
    pub out_c: u64,
    pub k: u64,
    #[serde(default = "default_repeat")]
    pub repeat: usize,
}

fn default_repeat() -> usize {
    1
}

/// the ordered list of layers both engines walk through
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Workload {
    layers: Vec<ConvLayer>,
}

impl Workload {
    pub fn new(layers: Vec<ConvLayer>) -> Self {
        Workload { layers }
    }

    /// `count` copies of `layer`
    pub fn repeated(layer: ConvLayer, count: usize) -> Self {
        Workload {
            layers: vec![layer; count],
        }
    }

    pub fn layers(&self) -> &[ConvLayer] {
        &self.layers
    }
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
    /// saturates at `u64::MAX`
    pub fn total_macs(&self) -> u64 {
        self.layers
            .iter()
            .map(ConvLayer::mac_ops)
            .fold(0, u64::saturating_add)
    }
}

impl TryFrom<&[LayerSettings]> for Workload {
    type Error = WorkloadError;

    /// expand the settings entries in order, each one `repeat` times
    fn try_from(settings: &[LayerSettings]) -> Result<Self, Self::Error> {
        let mut layers = vec![];
        for s in settings {
            let layer = ConvLayer::new(&s.name, s.in_c, s.h, s.w, s.out_c, s.k)?;
            layers.extend(std::iter::repeat(layer).take(s.repeat));
        }
        Ok(Workload { layers })
    }
}

#[cfg(test)]
mod workload_test {
    use super::*;

    #[test]
    fn test_mac_ops() {
        let layer = ConvLayer::new("layer", 32, 16, 16, 32, 3).unwrap();
        assert_eq!(layer.mac_ops(), 32 * 16 * 16 * 32 * 9);
        assert_eq!(ConvLayer::new("tiny", 1, 1, 1, 1, 1).unwrap().mac_ops(), 1);
        assert_eq!(ConvLayer::unit("tiny"), ConvLayer::new("tiny", 1, 1, 1, 1, 1).unwrap());
        assert_eq!(ConvLayer::new("empty", 0, 1, 1, 1, 1).unwrap().mac_ops(), 0);
    }

    #[test]
    fn test_mac_overflow() {
        let err = ConvLayer::new("big", 1 << 20, 1 << 20, 1 << 20, 1 << 10, 1).unwrap_err();
        assert_eq!(
            err,
            WorkloadError::MacOverflow {
                name: "big".into()
            }
        );
        // a zero dimension never overflows
        assert!(ConvLayer::new("zero", u64::MAX, u64::MAX, 0, u64::MAX, 1).is_ok());

        let settings = vec![LayerSettings {
            name: "huge".into(),
            in_c: u64::MAX,
            h: 2,
            w: 1,
            out_c: 1,
            k: 1,
            repeat: 1,
        }];
        assert!(Workload::try_from(settings.as_slice()).is_err());
    }

    #[test]
    fn test_from_settings() {
        let settings = vec![
            LayerSettings {
                name: "a".into(),
                in_c: 1,
                h: 2,
                w: 2,
                out_c: 1,
                k: 1,
                repeat: 2,
            },
            LayerSettings {
                name: "b".into(),
                in_c: 1,
                h: 1,
                w: 1,
                out_c: 1,
                k: 3,
                repeat: 1,
            },
        ];
        let workload = Workload::try_from(settings.as_slice()).unwrap();
        assert_eq!(workload.len(), 3);
        let names: Vec<_> = workload.layers().iter().map(|l| l.name()).collect();
        assert_eq!(names, vec!["a", "a", "b"]);
        assert_eq!(workload.total_macs(), 4 + 4 + 9);
    }

    #[test]
    fn test_empty() {
        let settings: Vec<LayerSettings> = vec![];
        let workload = Workload::try_from(settings.as_slice()).unwrap();
        assert!(workload.is_empty());
        assert_eq!(workload.total_macs(), 0);
    }
}

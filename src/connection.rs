//! Connection classification.
//!
//! Decides whether the current client should be treated as "slow" for image
//! loading purposes. The classification is recomputed from the environment on
//! every call — nothing is cached, so a mid-session network change is picked
//! up by the next check.

use crate::page::{EffectiveType, Page};

/// Coarse client classification derived from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionClass {
    Fast,
    Slow,
}

/// Classify the client from network information when the runtime exposes it,
/// falling back to viewport width below `breakpoint` as a proxy signal.
///
/// With network information present, the client is slow when the effective
/// type is slow-2g, 2g, or 3g, or when the data-saver preference is set.
pub fn classify(page: &dyn Page, breakpoint: u32) -> ConnectionClass {
    if let Some(net) = page.network() {
        let slow_type = matches!(
            net.effective_type,
            EffectiveType::Slow2g | EffectiveType::TwoG | EffectiveType::ThreeG
        );
        if slow_type || net.save_data {
            return ConnectionClass::Slow;
        }
        return ConnectionClass::Fast;
    }
    if page.viewport().width < breakpoint {
        ConnectionClass::Slow
    } else {
        ConnectionClass::Fast
    }
}

/// Shorthand for `classify(...) == Slow`.
pub fn is_slow(page: &dyn Page, breakpoint: u32) -> bool {
    classify(page, breakpoint) == ConnectionClass::Slow
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::NetworkInfo;
    use crate::sim::SimPageBuilder;

    fn page_with(network: Option<NetworkInfo>, width: u32) -> std::sync::Arc<crate::sim::SimPage> {
        SimPageBuilder::new()
            .viewport(width, 800)
            .network(network)
            .build()
    }

    #[test]
    fn slow_effective_types_classify_slow() {
        for et in [EffectiveType::Slow2g, EffectiveType::TwoG, EffectiveType::ThreeG] {
            let page = page_with(
                Some(NetworkInfo {
                    effective_type: et,
                    save_data: false,
                }),
                1920,
            );
            assert_eq!(classify(page.as_ref(), 768), ConnectionClass::Slow);
        }
    }

    #[test]
    fn fast_type_on_wide_viewport_is_fast() {
        let page = page_with(
            Some(NetworkInfo {
                effective_type: EffectiveType::FourG,
                save_data: false,
            }),
            1920,
        );
        assert_eq!(classify(page.as_ref(), 768), ConnectionClass::Fast);
    }

    #[test]
    fn save_data_overrides_fast_type() {
        let page = page_with(
            Some(NetworkInfo {
                effective_type: EffectiveType::FourG,
                save_data: true,
            }),
            1920,
        );
        assert_eq!(classify(page.as_ref(), 768), ConnectionClass::Slow);
    }

    #[test]
    fn width_proxy_when_network_info_is_absent() {
        assert_eq!(classify(page_with(None, 375).as_ref(), 768), ConnectionClass::Slow);
        assert_eq!(classify(page_with(None, 768).as_ref(), 768), ConnectionClass::Fast);
        assert_eq!(classify(page_with(None, 1280).as_ref(), 768), ConnectionClass::Fast);
    }

    #[test]
    fn network_info_takes_priority_over_width() {
        // Narrow viewport but a fast reported connection: not slow.
        let page = page_with(
            Some(NetworkInfo {
                effective_type: EffectiveType::FourG,
                save_data: false,
            }),
            375,
        );
        assert_eq!(classify(page.as_ref(), 768), ConnectionClass::Fast);
    }
}

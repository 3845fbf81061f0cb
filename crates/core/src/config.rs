use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;
use crate::record::AlertCategory;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub indicators: IndicatorConfig,
    pub export: ExportConfig,
}

impl AppConfig {
    /// Checks cross-field constraints figment cannot express.
    ///
    /// # Errors
    /// Returns the first [`CoreError`] found in the indicator or export
    /// section.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.indicators.validate()?;
        self.export.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// CSV file holding the record table
    pub path: PathBuf,
    pub columns: ColumnNames,
    /// Labels (compared trimmed and lowercased) that mark a row as anomalous
    pub sentinels: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/dunusual_stock.csv"),
            columns: ColumnNames::default(),
            sentinels: vec!["bất thường".to_string(), "abnormal".to_string()],
        }
    }
}

/// Header text for every column the pipeline reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub ticker: String,
    pub close: String,
    pub volume: String,
    pub price_volatility_alert: String,
    pub foreign_flow_alert: String,
    pub liquidity_alert: String,
    pub bollinger_alert: String,
    pub rsi_alert: String,
    pub macd_alert: String,
    pub atr_alert: String,
    pub anomaly_label: String,
    pub anomaly_score: String,
    pub rsi: String,
    pub macd: String,
    pub signal_line: String,
}

impl ColumnNames {
    #[must_use]
    pub fn alert(&self, category: AlertCategory) -> &str {
        match category {
            AlertCategory::PriceVolatility => &self.price_volatility_alert,
            AlertCategory::ForeignFlow => &self.foreign_flow_alert,
            AlertCategory::Liquidity => &self.liquidity_alert,
            AlertCategory::Bollinger => &self.bollinger_alert,
            AlertCategory::Rsi => &self.rsi_alert,
            AlertCategory::Macd => &self.macd_alert,
            AlertCategory::Atr => &self.atr_alert,
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: "Ngày".to_string(),
            ticker: "Mã cổ phiếu".to_string(),
            close: "Giá đóng cửa".to_string(),
            volume: "Khối lượng giao dịch".to_string(),
            price_volatility_alert: "Cảnh báo biến động giá".to_string(),
            foreign_flow_alert: "Cảnh báo dòng tiền khối ngoại".to_string(),
            liquidity_alert: "Cảnh báo thanh khoản".to_string(),
            bollinger_alert: "Cảnh báo Bollinger".to_string(),
            rsi_alert: "Cảnh báo RSI".to_string(),
            macd_alert: "Cảnh báo MACD".to_string(),
            atr_alert: "Cảnh báo ATR".to_string(),
            anomaly_label: "Nhận diện bất thường".to_string(),
            anomaly_score: "Anomaly_Score".to_string(),
            rsi: "RSI".to_string(),
            macd: "MACD".to_string(),
            signal_line: "Signal_Line".to_string(),
        }
    }
}

/// Bollinger and RSI parameters. The window differs between deployments
/// (5, 10 and 20 are all in use), so it is always read from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub window: usize,
    pub std_dev_multiplier: f64,
    pub rsi_period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl IndicatorConfig {
    /// # Errors
    /// Returns [`CoreError::InvalidWindow`] or [`CoreError::InvalidParameter`]
    /// when a value is outside its domain.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.window == 0 {
            return Err(CoreError::InvalidWindow(self.window));
        }
        if !(self.std_dev_multiplier.is_finite() && self.std_dev_multiplier > 0.0) {
            return Err(CoreError::InvalidParameter {
                name: "std_dev_multiplier",
                reason: format!("must be a positive number, got {}", self.std_dev_multiplier),
            });
        }
        if self.rsi_period == 0 {
            return Err(CoreError::InvalidParameter {
                name: "rsi_period",
                reason: "must be >= 1".to_string(),
            });
        }
        if !(0.0..=100.0).contains(&self.oversold)
            || !(0.0..=100.0).contains(&self.overbought)
            || self.oversold >= self.overbought
        {
            return Err(CoreError::InvalidParameter {
                name: "oversold/overbought",
                reason: format!(
                    "need 0 <= oversold < overbought <= 100, got {} / {}",
                    self.oversold, self.overbought
                ),
            });
        }
        Ok(())
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            window: 20,
            std_dev_multiplier: 2.0,
            rsi_period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Unicode TrueType font embedded into PDF exports
    pub font_path: PathBuf,
    pub sheet_name: String,
    /// Title line printed above the PDF grid
    pub title: String,
    pub column_width_mm: f32,
    pub row_height_mm: f32,
    pub font_size: f32,
}

impl ExportConfig {
    /// Rejects PDF grid dimensions that would produce empty or inverted
    /// layouts.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidParameter`] naming the first non-positive
    /// or non-finite dimension.
    pub fn validate(&self) -> Result<(), CoreError> {
        let dimensions = [
            ("column_width_mm", self.column_width_mm),
            ("row_height_mm", self.row_height_mm),
            ("font_size", self.font_size),
        ];
        for (name, value) in dimensions {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidParameter {
                    name,
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from("DejaVuSans.ttf"),
            sheet_name: "Abnormal Stocks".to_string(),
            title: "Danh sách cổ phiếu bất thường".to_string(),
            column_width_mm: 40.0,
            row_height_mm: 10.0,
            font_size: 12.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = IndicatorConfig {
            window: 0,
            ..IndicatorConfig::default()
        };
        assert_eq!(config.validate(), Err(CoreError::InvalidWindow(0)));
    }

    #[test]
    fn test_inverted_rsi_thresholds_rejected() {
        let config = IndicatorConfig {
            overbought: 30.0,
            oversold: 70.0,
            ..IndicatorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_bad_export_dimensions_rejected() {
        let config = AppConfig {
            export: ExportConfig {
                row_height_mm: -5.0,
                ..ExportConfig::default()
            },
            ..AppConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidParameter { name: "row_height_mm", .. })
        ));

        let config = ExportConfig {
            font_size: f32::NAN,
            ..ExportConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CoreError::InvalidParameter { name: "font_size", .. })
        ));

        let config = ExportConfig {
            column_width_mm: 0.0,
            ..ExportConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"indicators": {"window": 5}}"#).unwrap();
        assert_eq!(config.indicators.window, 5);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.export.sheet_name, "Abnormal Stocks");
    }
}

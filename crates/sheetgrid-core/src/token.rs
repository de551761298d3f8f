use crate::error::{Axis, GridError, TokenDefect};

/// A positioned text fragment extracted from one page.
///
/// Positions are baseline coordinates in the page space of the upstream
/// extractor. Both are guaranteed finite: tokens built through
/// [`Token::new`] or converted from a [`TokenRecord`] are validated.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "TokenRecord")
)]
pub struct Token {
    text: String,
    x: f64,
    y: f64,
}

impl Token {
    /// Create a token, rejecting NaN or infinite positions.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Result<Self, TokenDefect> {
        check_finite(Axis::X, x)?;
        check_finite(Axis::Y, y)?;
        Ok(Self {
            text: text.into(),
            x,
            y,
        })
    }

    /// The text content. May be empty or whitespace.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Horizontal baseline position.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical baseline position.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Consume the token, returning its text.
    pub fn into_text(self) -> String {
        self.text
    }
}

fn check_finite(axis: Axis, value: f64) -> Result<(), TokenDefect> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TokenDefect::NonFinite { axis, value })
    }
}

/// A token as delivered by an upstream source, before validation.
///
/// Every field is optional so that an incomplete entry can be reported as
/// [`GridError::MalformedToken`] instead of failing the whole input.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TokenRecord {
    /// Text content.
    pub text: Option<String>,
    /// Horizontal baseline position.
    pub x: Option<f64>,
    /// Vertical baseline position.
    pub y: Option<f64>,
}

impl TokenRecord {
    /// Build a complete record.
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: Some(text.into()),
            x: Some(x),
            y: Some(y),
        }
    }

    /// Validate this record into a [`Token`].
    pub fn to_token(&self) -> Result<Token, TokenDefect> {
        Token::try_from(self.clone())
    }
}

impl TryFrom<TokenRecord> for Token {
    type Error = TokenDefect;

    fn try_from(record: TokenRecord) -> Result<Self, Self::Error> {
        let text = record.text.ok_or(TokenDefect::MissingField("text"))?;
        let x = record.x.ok_or(TokenDefect::MissingField("x"))?;
        let y = record.y.ok_or(TokenDefect::MissingField("y"))?;
        Token::new(text, x, y)
    }
}

impl From<&Token> for TokenRecord {
    fn from(token: &Token) -> Self {
        Self::new(token.text.clone(), token.x, token.y)
    }
}

/// Validate a page of records, stopping at the first defective one.
///
/// No partial result is returned: a single bad record rejects the page.
pub fn validate_records(records: &[TokenRecord]) -> Result<Vec<Token>, GridError> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .to_token()
                .map_err(|defect| GridError::MalformedToken { index, defect })
        })
        .collect()
}

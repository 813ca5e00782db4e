// ============================================================================
// Structure : Token
// ============================================================================
// Catalogue statique des cryptomonnaies supportées par le service de prédiction
//
// CONCEPTS RUST :
// 1. &'static str : les champs pointent vers des littéraux du binaire
//    - Pas d'allocation, le catalogue vit pendant toute l'exécution
// 2. static slice : TOKEN_CATALOG est défini une fois, jamais modifié
// ============================================================================

/// Token supporté par le service de prédiction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Clé stable du catalogue, envoyée telle quelle au service (ex: "bitcoin")
    pub id: &'static str,

    /// Ticker affiché (ex: "BTC")
    pub symbol: &'static str,

    /// Nom complet (ex: "Bitcoin")
    pub name: &'static str,

    /// Couleur d'accent au format "#RRGGBB" (indication d'affichage)
    pub color: &'static str,
}

/// Tokens supportés, dans l'ordre d'affichage
#[rustfmt::skip]
pub static TOKEN_CATALOG: &[Token] = &[
    Token { id: "bitcoin", symbol: "BTC", name: "Bitcoin", color: "#F7931A" },
    Token { id: "ethereum", symbol: "ETH", name: "Ethereum", color: "#627EEA" },
    Token { id: "solana", symbol: "SOL", name: "Solana", color: "#00FFBD" },
    Token { id: "cardano", symbol: "ADA", name: "Cardano", color: "#0033AD" },
    Token { id: "ripple", symbol: "XRP", name: "Ripple", color: "#23292F" },
    Token { id: "dogecoin", symbol: "DOGE", name: "Dogecoin", color: "#C3A634" },
    Token { id: "polkadot", symbol: "DOT", name: "Polkadot", color: "#E6007A" },
    Token { id: "avalanche-2", symbol: "AVAX", name: "Avalanche", color: "#E84142" },
    Token { id: "matic-network", symbol: "MATIC", name: "Polygon", color: "#8247E5" },
    Token { id: "chainlink", symbol: "LINK", name: "Chainlink", color: "#2A5ADA" },
];

impl Token {
    /// Cherche un token du catalogue par son id
    ///
    /// CONCEPT RUST : Option<&'static T>
    /// - Retourne une référence vers l'élément du static, pas une copie
    pub fn find(id: &str) -> Option<&'static Token> {
        TOKEN_CATALOG.iter().find(|token| token.id == id)
    }

    /// Décode la couleur "#RRGGBB" en composantes (r, g, b)
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        Some((r, g, b))
    }

    /// Formatte le token pour la liste du catalogue
    pub fn display(&self) -> String {
        format!("{:<6} {}", self.symbol, self.name)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

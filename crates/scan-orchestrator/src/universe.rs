//! Static candidate universes for scanning, discovery, and recommendations.

use watchlist::Candidate;

/// Default symbols for an unparameterized scan
pub const DEFAULT_SCAN_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "JPM", "V", "WMT", "CRCT", "ETSY",
    "PINS", "DIS", "NFLX",
];

/// Upper bound on symbols per scan request
pub const MAX_SCAN_SYMBOLS: usize = 30;

/// Discovery pools: labelled slices of the market, a few dozen liquid names
/// each, so random picks stay tradeable
pub const DISCOVERY_POOLS: &[(&str, &[&str])] = &[
    (
        "Large Cap Tech",
        &[
            "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "AVGO", "ORCL", "CRM",
            "ADBE", "AMD", "INTC", "CSCO", "QCOM", "TXN", "IBM", "NOW", "UBER", "SHOP",
        ],
    ),
    (
        "Finance",
        &[
            "JPM", "V", "MA", "BAC", "WFC", "GS", "MS", "SCHW", "BLK", "AXP", "C", "USB", "PNC",
            "COF", "PYPL", "SQ", "COIN", "HOOD", "SOFI", "ALLY",
        ],
    ),
    (
        "Healthcare",
        &[
            "UNH", "JNJ", "LLY", "PFE", "ABBV", "MRK", "TMO", "ABT", "DHR", "BMY", "AMGN", "GILD",
            "MRNA", "REGN", "ISRG", "DXCM", "VEEV", "ZBH", "HCA", "CVS",
        ],
    ),
    (
        "Consumer",
        &[
            "WMT", "COST", "HD", "MCD", "SBUX", "NKE", "TGT", "LOW", "TJX", "LULU", "CMG", "DPZ",
            "YUM", "ROST", "DG", "DLTR", "KR", "EL", "DECK", "CROX",
        ],
    ),
    (
        "Energy & Materials",
        &[
            "XOM", "CVX", "COP", "SLB", "EOG", "PSX", "VLO", "OXY", "LIN", "APD", "ECL", "NEM",
            "FCX", "FSLR", "ENPH", "NEE", "DUK", "SO", "D", "AEP",
        ],
    ),
    (
        "Industrial",
        &[
            "CAT", "DE", "HON", "GE", "RTX", "LMT", "BA", "UPS", "FDX", "UNP", "WM", "ETN", "ITW",
            "EMR", "GD", "NOC", "MMM", "JCI", "ROK", "FAST",
        ],
    ),
    (
        "Media & Telecom",
        &[
            "DIS", "NFLX", "CMCSA", "T", "VZ", "TMUS", "SPOT", "ROKU", "WBD", "PARA", "LYV",
            "RBLX", "EA", "TTWO", "MTCH", "SNAP", "PINS", "ZM", "DKNG", "CHTR",
        ],
    ),
    (
        "Small & Mid Cap",
        &[
            "PLTR", "SNOW", "CRWD", "DDOG", "NET", "ZS", "MDB", "HUBS", "BILL", "PCTY", "PAYC",
            "FIVE", "TOST", "CAVA", "BROS", "SHAK", "WING", "DUOL", "MNDY", "GTLB",
        ],
    ),
    (
        "REITs & Dividend",
        &[
            "O", "AMT", "PLD", "SPG", "EQIX", "PSA", "DLR", "VICI", "WELL", "AVB", "KO", "PEP",
            "PG", "CL", "CLX", "GIS", "K", "SJM", "MO", "PM",
        ],
    ),
    (
        "International ADR",
        &[
            "TSM", "BABA", "NVO", "ASML", "TM", "SONY", "SAP", "MELI", "SE", "NU", "GLOB", "WIX",
            "GRAB", "CPNG", "JD", "PDD", "BIDU", "NIO", "LI", "XPEV",
        ],
    ),
];

/// Sector-labelled recommendation universe
pub const RECOMMENDATION_POOLS: &[(&str, &[&str])] = &[
    (
        "Technology",
        &[
            "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "AVGO", "ORCL", "CRM", "ADBE", "AMD",
            "CSCO", "QCOM", "TXN", "NOW", "UBER", "SHOP", "CRWD", "DDOG", "NET", "HUBS", "INTU",
            "SNPS", "CDNS", "KLAC", "LRCX", "AMAT", "MRVL", "PANW", "FTNT",
        ],
    ),
    (
        "Financial Services",
        &[
            "JPM", "V", "MA", "BAC", "GS", "MS", "SCHW", "BLK", "AXP", "PNC", "COF", "PYPL",
            "MCO", "SPGI", "ICE", "CME", "MSCI", "FIS", "AJG", "MMC",
        ],
    ),
    (
        "Healthcare",
        &[
            "UNH", "JNJ", "LLY", "ABBV", "MRK", "TMO", "ABT", "DHR", "AMGN", "REGN", "ISRG",
            "DXCM", "VEEV", "HCA", "SYK", "EW", "IDXX", "WST", "ZTS", "A",
        ],
    ),
    (
        "Consumer Cyclical",
        &[
            "HD", "MCD", "SBUX", "NKE", "TJX", "LULU", "CMG", "ROST", "ORLY", "AZO", "TSCO",
            "POOL", "DECK", "BKNG", "LOW", "DPZ", "YUM", "CPRT", "ULTA", "RH",
        ],
    ),
    (
        "Consumer Defensive",
        &[
            "COST", "WMT", "PG", "KO", "PEP", "CL", "MNST", "SJM", "HSY", "CHD", "CLX", "KMB",
            "GIS", "K", "MDLZ", "EL", "STZ", "BF-B", "KR", "WBA",
        ],
    ),
    (
        "Industrials",
        &[
            "CAT", "DE", "HON", "GE", "RTX", "UNP", "WM", "ETN", "ITW", "EMR", "ROK", "FAST",
            "SHW", "ECL", "CTAS", "ODFL", "VRSK", "GWW", "ROP", "TT",
        ],
    ),
    (
        "Communication",
        &[
            "DIS", "NFLX", "CMCSA", "TMUS", "EA", "TTWO", "SPOT", "LYV", "RBLX", "CHTR", "OMC",
            "IPG", "ZM", "MTCH", "DKNG", "PARA", "WBD",
        ],
    ),
    (
        "Real Estate",
        &["AMT", "PLD", "CCI", "EQIX", "PSA", "DLR", "O", "WELL", "SPG", "VICI"],
    ),
    (
        "Energy",
        &["XOM", "CVX", "COP", "SLB", "EOG", "LIN", "APD", "FSLR", "NEE", "OKE"],
    ),
];

/// Flatten the recommendation pools into (symbol, sector) candidates
pub fn recommendation_universe() -> Vec<Candidate> {
    RECOMMENDATION_POOLS
        .iter()
        .flat_map(|(sector, symbols)| {
            symbols.iter().map(move |s| Candidate {
                symbol: (*s).to_string(),
                sector: (*sector).to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_universe_is_sector_labelled() {
        let universe = recommendation_universe();
        assert!(universe.len() > 150);
        assert!(universe
            .iter()
            .any(|c| c.symbol == "AAPL" && c.sector == "Technology"));
        assert!(universe.iter().all(|c| !c.sector.is_empty()));
    }

    #[test]
    fn default_scan_universe_is_within_the_cap() {
        assert!(DEFAULT_SCAN_SYMBOLS.len() <= MAX_SCAN_SYMBOLS);
    }
}

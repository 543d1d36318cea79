//! Page selection from the command line and tab lookup helpers.

use cryptoboard_client::{home_tab_specs, Page};
use cryptoboard_core::TabId;

/// Page parameters taken from `--coin <id>`, `--query <text>` and `--chart`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageArgs {
    pub coin: Option<String>,
    pub query: Option<String>,
    pub chart: bool,
}

impl PageArgs {
    /// Parse arguments, program name excluded. Unknown flags are skipped.
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = PageArgs::default();
        let mut args = args.into_iter().map(Into::into);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--coin" => parsed.coin = args.next(),
                "--query" => parsed.query = Some(args.next().unwrap_or_default()),
                "--chart" => parsed.chart = true,
                "--config" => {
                    args.next();
                }
                _ => {}
            }
        }
        parsed
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    pub fn page(&self) -> Page {
        Page::from_params(self.coin.as_deref(), self.query.as_deref(), self.chart)
    }
}

pub fn tab_label(tab: &TabId) -> &'static str {
    home_tab_specs()
        .into_iter()
        .find(|(id, _, _)| *id == tab.as_str())
        .map(|(_, label, _)| label)
        .unwrap_or("?")
}

/// Home tab at `index` in display order.
pub fn tab_at(index: usize) -> Option<TabId> {
    home_tab_specs()
        .get(index)
        .map(|(id, _, _)| TabId::new(*id))
}

//! Home page: trending lists and the four lazily loaded tabs.

use cryptoboard_client::home_tab_specs;
use cryptoboard_client::session::{TAB_ASSETS, TAB_CATEGORIES, TAB_COMPANIES, TAB_EXCHANGES};
use cryptoboard_core::endpoints::{
    TARGET_ASSETS, TARGET_CATEGORIES, TARGET_COMPANIES, TARGET_EXCHANGES, TARGET_TRENDING_COINS,
    TARGET_TRENDING_NFTS,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Tabs},
    Frame,
};

use super::helpers::{change_cell, region_ready, DataTable};
use crate::state::App;
use crate::theme::direction_color;
use crate::widgets::{sparkline, RegionStatus};
use cryptoboard_core::format;

const SPARKLINE_WIDTH: usize = 14;

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let trending = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[0]);
    render_trending_coins(f, app, trending[0]);
    render_trending_nfts(f, app, trending[1]);

    render_tab_bar(f, app, layout[1]);

    match app.active_tab() {
        Some(TAB_ASSETS) => render_assets(f, app, layout[2]),
        Some(TAB_EXCHANGES) => render_exchanges(f, app, layout[2]),
        Some(TAB_CATEGORIES) => render_categories(f, app, layout[2]),
        Some(TAB_COMPANIES) => render_companies(f, app, layout[2]),
        _ => {}
    }
}

fn status(app: &App, target: &str) -> RegionStatus {
    RegionStatus::of(app.session().regions(), target)
}

fn render_trending_coins(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Trending Coins";
    if !region_ready(f, area, status(app, TARGET_TRENDING_COINS), title, &app.palette) {
        return;
    }
    let rows = app
        .views
        .trending_coins
        .iter()
        .map(|coin| {
            Row::new(vec![
                Cell::from(coin.name.clone()),
                Cell::from(coin.price_btc.clone()),
                Cell::from(coin.market_cap.clone()),
                Cell::from(coin.volume.clone()),
                change_cell(format::percent_or_na(coin.change, 2), coin.change, &app.palette),
            ])
        })
        .collect();
    DataTable {
        title,
        headers: &["Coin", "Price", "Market Cap", "Volume", "24h%"],
        widths: &[
            Constraint::Percentage(30),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(15),
        ],
        rows,
        selected: None,
    }
    .render(f, area, &app.palette);
}

fn render_trending_nfts(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Trending NFTs";
    if !region_ready(f, area, status(app, TARGET_TRENDING_NFTS), title, &app.palette) {
        return;
    }
    let rows = app
        .views
        .trending_nfts
        .iter()
        .map(|nft| {
            Row::new(vec![
                Cell::from(nft.name.clone()),
                Cell::from(nft.market.clone()),
                Cell::from(nft.floor_price.clone()),
                Cell::from(nft.volume.clone()),
                change_cell(format::percent_or_na(nft.change, 2), nft.change, &app.palette),
            ])
        })
        .collect();
    DataTable {
        title,
        headers: &["NFT", "Market", "Price", "24h Vol", "24h%"],
        widths: &[
            Constraint::Percentage(30),
            Constraint::Percentage(10),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
        ],
        rows,
        selected: None,
    }
    .render(f, area, &app.palette);
}

fn render_tab_bar(f: &mut Frame<'_>, app: &App, area: Rect) {
    let specs = home_tab_specs();
    let titles: Vec<String> = specs
        .iter()
        .enumerate()
        .map(|(i, (_, label, _))| format!("{} {}", i + 1, label))
        .collect();
    let selected = app
        .active_tab()
        .and_then(|active| specs.iter().position(|(id, _, _)| *id == active))
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.palette.border)),
        )
        .style(Style::default().fg(app.palette.text_dim))
        .highlight_style(
            Style::default()
                .fg(app.palette.primary)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn render_assets(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Assets";
    if !region_ready(f, area, status(app, TARGET_ASSETS), title, &app.palette) {
        return;
    }
    let palette = &app.palette;
    let rows = app
        .views
        .assets
        .iter()
        .map(|asset| {
            let trend = Style::default().fg(direction_color(asset.sparkline_direction, palette));
            Row::new(vec![
                Cell::from(asset.rank.clone()),
                Cell::from(asset.name.clone()),
                Cell::from(asset.price.clone()),
                change_cell(asset.price_change.clone(), asset.change_pct, palette),
                change_cell(format::percent_or_na(asset.change_pct, 2), asset.change_pct, palette),
                Cell::from(asset.volume.clone()),
                Cell::from(asset.market_cap.clone()),
                Cell::from(Span::styled(sparkline(&asset.sparkline, SPARKLINE_WIDTH), trend)),
            ])
        })
        .collect();
    DataTable {
        title,
        headers: &[
            "Rank",
            "Coin",
            "Price",
            "24h Price",
            "24h Price %",
            "Total Vol",
            "Market Cap",
            "Last 7 Days",
        ],
        widths: &[
            Constraint::Length(5),
            Constraint::Min(18),
            Constraint::Length(12),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(18),
            Constraint::Length(20),
            Constraint::Length(SPARKLINE_WIDTH as u16),
        ],
        rows,
        selected: Some(app.selected()),
    }
    .render(f, area, palette);
}

fn render_exchanges(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Exchanges";
    if !region_ready(f, area, status(app, TARGET_EXCHANGES), title, &app.palette) {
        return;
    }
    let rows = app
        .views
        .exchanges
        .iter()
        .map(|ex| {
            Row::new(vec![
                ex.rank.clone(),
                ex.name.clone(),
                ex.trust_score.clone(),
                ex.volume_btc.clone(),
                ex.volume_btc_normalized.clone(),
                ex.country.clone(),
                ex.website.clone(),
                ex.year.clone(),
            ])
        })
        .collect();
    DataTable {
        title,
        headers: &[
            "Rank",
            "Exchange",
            "Trust Score",
            "24h Trade",
            "24h Trade (Normal)",
            "Country",
            "Website",
            "Year",
        ],
        widths: &[
            Constraint::Length(5),
            Constraint::Min(14),
            Constraint::Length(11),
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(26),
            Constraint::Length(5),
        ],
        rows,
        selected: Some(app.selected()),
    }
    .render(f, area, &app.palette);
}

fn render_categories(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Categories";
    if !region_ready(f, area, status(app, TARGET_CATEGORIES), title, &app.palette) {
        return;
    }
    let rows = app
        .views
        .categories
        .iter()
        .map(|cat| {
            Row::new(vec![
                Cell::from(cat.top_coins.to_string()),
                Cell::from(cat.name.clone()),
                Cell::from(cat.market_cap.clone()),
                change_cell(cat.change_text.clone(), cat.change, &app.palette),
                Cell::from(cat.volume.clone()),
            ])
        })
        .collect();
    DataTable {
        title,
        headers: &["Top Coins", "Category", "Market Cap", "24h Market Cap", "24h Volume"],
        widths: &[
            Constraint::Length(9),
            Constraint::Min(20),
            Constraint::Length(24),
            Constraint::Length(15),
            Constraint::Length(24),
        ],
        rows,
        selected: Some(app.selected()),
    }
    .render(f, area, &app.palette);
}

fn render_companies(f: &mut Frame<'_>, app: &App, area: Rect) {
    let title = "Companies";
    if !region_ready(f, area, status(app, TARGET_COMPANIES), title, &app.palette) {
        return;
    }
    let rows = app
        .views
        .companies
        .iter()
        .map(|co| {
            Row::new(vec![
                co.name.clone(),
                co.holdings.clone(),
                co.entry_value.clone(),
                co.current_value.clone(),
                co.supply_share.clone(),
            ])
        })
        .collect();
    DataTable {
        title,
        headers: &["Company", "Total BTC", "Entry Value", "Total Current Value", "Total %"],
        widths: &[
            Constraint::Min(20),
            Constraint::Length(14),
            Constraint::Length(22),
            Constraint::Length(22),
            Constraint::Length(10),
        ],
        rows,
        selected: Some(app.selected()),
    }
    .render(f, area, &app.palette);
}

use std::fmt::Write as _;

use serde_json::json;
use weatherwise_core::{
    BackgroundAssetResolver, DisplayFields, SceneCategory, VideoAssets, WeatherView,
    select_card_fields, select_scene,
};

const NO_DATA: &str = "No weather data available.";

pub fn print_view(view: &WeatherView, as_json: bool) -> anyhow::Result<()> {
    let assets = VideoAssets::default();

    let Some(weather) = view.weather() else {
        if as_json {
            println!("{}", serde_json::to_string_pretty(view)?);
        } else {
            println!("{NO_DATA}");
        }
        return Ok(());
    };

    let fields = select_card_fields(weather);
    let scene = select_scene(weather);
    let background = assets.asset_for(scene);

    if as_json {
        let out = json!({ "card": fields, "scene": scene, "background": background });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_card(&fields, scene, background));
    }

    Ok(())
}

fn format_card(f: &DisplayFields, scene: SceneCategory, background: &str) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", f.title);
    let _ = writeln!(out, "  {}°C  {}", f.temperature_c, f.description);
    if !f.icon_url.is_empty() {
        let _ = writeln!(out, "  Icon:        {}", f.icon_url);
    }
    if let Some(feels) = f.feels_like_c {
        let _ = writeln!(out, "  Feels like:  {feels}°C");
    }
    if let (Some(min), Some(max)) = (f.temp_min_c, f.temp_max_c) {
        let _ = writeln!(out, "  Min / Max:   {min}°C / {max}°C");
    }
    let _ = writeln!(out, "  Humidity:    {}%", f.humidity_pct);
    let _ = writeln!(out, "  Wind:        {}", f.wind);
    if let Some(p) = f.pressure_hpa {
        let _ = writeln!(out, "  Pressure:    {p} hPa");
    }
    if let Some(c) = f.cloud_cover_pct {
        let _ = writeln!(out, "  Cloud cover: {c}%");
    }
    if let Some(sunrise) = &f.sunrise {
        let _ = writeln!(out, "  Sunrise:     {sunrise}");
    }
    if let Some(sunset) = &f.sunset {
        let _ = writeln!(out, "  Sunset:      {sunset}");
    }
    let _ = writeln!(out, "  Time:        {}", f.observed_at);
    let _ = writeln!(out, "  Scene:       {scene} ({background})");

    out
}

//! Japanese place names to uppercase English display labels.
//!
//! Translation is plain literal substitution over two ordered tables:
//! [`PLACES`] (prefectures, sub-prefecture regions, seas) and then
//! [`SUFFIXES`] (directions, coastal terms, administrative suffixes,
//! separators). Each replacement is padded with spaces and the result is
//! uppercased and whitespace-normalized, so names that are already ASCII pass
//! through unchanged apart from case and spacing.
//!
//! ## Table order
//!
//! Entries are tried top to bottom and the order is load-bearing: a key must
//! never contain an earlier key, otherwise the earlier one eats part of it
//! first. Longer compounds therefore sit above their fragments (`北東部`
//! before `北東` before `北`, `伊豆大島` before `伊豆`). Keys that overlap
//! when written back to back need the same care: `佐渡` sits above `渡島` so
//! that `佐渡島` keeps its `佐` (and `土佐` above both), and `北東方` is its own entry because `北東`
//! would otherwise strand the `方` of `東方`. The `no_key_is_shadowed` and
//! `adjacent_keys_translate_fully` tests enforce both rules.

/// Translate a Japanese place name into its display label.
///
/// Returns an empty string for empty input. Characters with no table entry
/// are left in place.
pub fn translate(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut out = text.to_string();
    for table in [PLACES, SUFFIXES] {
        for (ja, en) in table {
            if out.contains(ja) {
                out = out.replace(ja, &format!(" {} ", en));
            }
        }
    }

    out.to_uppercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `text` still holds kana or kanji after translation.
pub fn has_japanese(text: &str) -> bool {
    text.chars().any(|c| {
        matches!(c,
            '\u{3000}'..='\u{303F}'   // CJK punctuation
            | '\u{3040}'..='\u{30FF}' // hiragana, katakana
            | '\u{4E00}'..='\u{9FFF}' // unified ideographs
            | '\u{FF00}'..='\u{FFEF}' // full-width forms
        )
    })
}

/// Prefectures first, then regions and sea areas.
pub const PLACES: &[(&str, &str)] = &[
    // Prefectures
    ("北海道", "HOKKAIDO"),
    ("青森県", "AOMORI"),
    ("岩手県", "IWATE"),
    ("宮城県", "MIYAGI"),
    ("秋田県", "AKITA"),
    ("山形県", "YAMAGATA"),
    ("福島県", "FUKUSHIMA"),
    ("茨城県", "IBARAKI"),
    ("栃木県", "TOCHIGI"),
    ("群馬県", "GUNMA"),
    ("埼玉県", "SAITAMA"),
    ("千葉県", "CHIBA"),
    ("東京都", "TOKYO"),
    ("神奈川県", "KANAGAWA"),
    ("新潟県", "NIIGATA"),
    ("富山県", "TOYAMA"),
    ("石川県", "ISHIKAWA"),
    ("福井県", "FUKUI"),
    ("山梨県", "YAMANASHI"),
    ("長野県", "NAGANO"),
    ("岐阜県", "GIFU"),
    ("静岡県", "SHIZUOKA"),
    ("愛知県", "AICHI"),
    ("三重県", "MIE"),
    ("滋賀県", "SHIGA"),
    ("京都府", "KYOTO"),
    ("大阪府", "OSAKA"),
    ("兵庫県", "HYOGO"),
    ("奈良県", "NARA"),
    ("和歌山県", "WAKAYAMA"),
    ("鳥取県", "TOTTORI"),
    ("島根県", "SHIMANE"),
    ("岡山県", "OKAYAMA"),
    ("広島県", "HIROSHIMA"),
    ("山口県", "YAMAGUCHI"),
    ("徳島県", "TOKUSHIMA"),
    ("香川県", "KAGAWA"),
    ("愛媛県", "EHIME"),
    ("高知県", "KOCHI"),
    ("福岡県", "FUKUOKA"),
    ("佐賀県", "SAGA"),
    ("長崎県", "NAGASAKI"),
    ("熊本県", "KUMAMOTO"),
    ("大分県", "OITA"),
    ("宮崎県", "MIYAZAKI"),
    ("鹿児島県", "KAGOSHIMA"),
    ("沖縄県", "OKINAWA"),
    // Seas
    ("オホーツク海", "OKHOTSK SEA"),
    ("東シナ海", "EAST CHINA SEA"),
    ("瀬戸内海", "SETO INLAND SEA"),
    ("太平洋", "PACIFIC"),
    ("日本海", "SEA OF JAPAN"),
    // Hokkaido and Tohoku
    ("三陸", "SANRIKU"),
    ("十勝", "TOKACHI"),
    ("釧路", "KUSHIRO"),
    ("根室", "NEMURO"),
    ("胆振", "IBURI"),
    ("日高", "HIDAKA"),
    ("檜山", "HIYAMA"),
    ("後志", "SHIRIBESHI"),
    ("石狩", "ISHIKARI"),
    ("空知", "SORACHI"),
    ("上川", "KAMIKAWA"),
    ("留萌", "RUMOI"),
    ("宗谷", "SOYA"),
    ("網走", "ABASHIRI"),
    ("浦河", "URAKAWA"),
    ("千島", "KURIL"),
    ("津軽", "TSUGARU"),
    ("下北", "SHIMOKITA"),
    ("会津", "AIZU"),
    ("中通り", "NAKADORI"),
    ("浜通り", "HAMADORI"),
    // Kanto and Izu islands
    ("多摩", "TAMA"),
    ("九十九里", "KUJUKURI"),
    ("外房", "SOTOBO"),
    ("内房", "UCHIBO"),
    ("鹿島", "KASHIMA"),
    ("三浦", "MIURA"),
    ("相模", "SAGAMI"),
    ("伊豆大島", "IZU OSHIMA"),
    ("伊豆", "IZU"),
    ("新島", "NIIJIMA"),
    ("神津島", "KOZUSHIMA"),
    ("三宅島", "MIYAKEJIMA"),
    ("八丈島", "HACHIJOJIMA"),
    ("小笠原", "OGASAWARA"),
    ("父島", "CHICHIJIMA"),
    // Chugoku and Shikoku
    ("出雲", "IZUMO"),
    ("石見", "IWAMI"),
    ("隠岐", "OKI"),
    ("安芸", "AKI"),
    ("周防", "SUO"),
    ("伊予", "IYO"),
    ("東予", "TOYO"),
    ("中予", "CHUYO"),
    ("南予", "NANYO"),
    ("土佐", "TOSA"),
    // Chubu and Kinki
    ("上中下越", "JOETSU CHUETSU KAETSU"),
    ("上越", "JOETSU"),
    ("中越", "CHUETSU"),
    ("下越", "KAETSU"),
    ("佐渡", "SADO"),
    ("渡島", "OSHIMA"), // Hokkaido; kept below 佐渡
    ("能登", "NOTO"),
    ("加賀", "KAGA"),
    ("若狭", "WAKASA"),
    ("飛騨", "HIDA"),
    ("美濃", "MINO"),
    ("駿河", "SURUGA"),
    ("遠州", "ENSHU"),
    ("熊野", "KUMANO"),
    ("紀伊", "KII"),
    ("播磨", "HARIMA"),
    ("淡路", "AWAJI"),
    // Kyushu and Okinawa
    ("豊後", "BUNGO"),
    ("筑後", "CHIKUGO"),
    ("有明", "ARIAKE"),
    ("壱岐", "IKI"),
    ("対馬", "TSUSHIMA"),
    ("五島", "GOTO"),
    ("日向", "HYUGA"),
    ("薩摩", "SATSUMA"),
    ("大隅", "OSUMI"),
    ("種子島", "TANEGASHIMA"),
    ("屋久島", "YAKUSHIMA"),
    ("トカラ", "TOKARA"),
    ("奄美大島", "AMAMI OSHIMA"),
    ("奄美", "AMAMI"),
    ("沖縄本島", "OKINAWA MAIN ISLAND"),
    ("宮古島", "MIYAKOJIMA"),
    ("八重山", "YAEYAMA"),
    ("石垣島", "ISHIGAKIJIMA"),
    ("西表島", "IRIOMOTEJIMA"),
    ("与那国島", "YONAGUNIJIMA"),
    ("大東島", "DAITOJIMA"),
    // Abroad
    ("朝鮮", "KOREA"),
    ("台湾", "TAIWAN"),
    // Bare city names left over once the prefecture is gone
    ("東京", "TOKYO"),
    ("大阪", "OSAKA"),
    ("熊本", "KUMAMOTO"),
];

/// Three-character compounds, then two, then single-character fallbacks.
pub const SUFFIXES: &[(&str, &str)] = &[
    ("北東部", "NORTHEAST"),
    ("北西部", "NORTHWEST"),
    ("南東部", "SOUTHEAST"),
    ("南西部", "SOUTHWEST"),
    ("北東方", "NORTHEAST"),
    ("北西方", "NORTHWEST"),
    ("南東方", "SOUTHEAST"),
    ("南西方", "SOUTHWEST"),
    ("中東部", "CENTRAL EAST"),
    ("中西部", "CENTRAL WEST"),
    ("平野部", "PLAINS"),
    ("山沿い", "MOUNTAINS"),
    ("北東", "NORTHEAST"),
    ("北西", "NORTHWEST"),
    ("南東", "SOUTHEAST"),
    ("南西", "SOUTHWEST"),
    ("東方", "EAST"),
    ("西方", "WEST"),
    ("南方", "SOUTH"),
    ("北方", "NORTH"),
    ("北部", "NORTH"),
    ("南部", "SOUTH"),
    ("東部", "EAST"),
    ("西部", "WEST"),
    ("中部", "CENTRAL"),
    ("内陸", "INLAND"),
    ("地方", "REGION"),
    ("付近", "VICINITY"),
    ("近海", "COASTAL WATERS"),
    ("沿岸", "COAST"),
    ("海域", "SEA AREA"),
    ("海峡", "STRAIT"),
    ("水道", "CHANNEL"),
    ("諸島", "ISLANDS"),
    ("列島", "ISLANDS"),
    ("半島", "PENINSULA"),
    ("沖", "OFFSHORE"),
    ("灘", "SEA"),
    ("湾", "BAY"),
    ("海", "SEA"),
    ("島", "ISLAND"),
    ("県", "PREF"),
    ("府", "PREF"),
    ("都", "METRO"),
    ("道", "PREF"),
    ("郡", "DISTRICT"),
    ("市", "CITY"),
    ("区", "WARDS"),
    ("町", "TOWN"),
    ("村", "VILLAGE"),
    ("北", "NORTH"),
    ("南", "SOUTH"),
    ("東", "EAST"),
    ("西", "WEST"),
    ("中", "CENTRAL"),
    ("・", "/"),
    ("、", ","),
];

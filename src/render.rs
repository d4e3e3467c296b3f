// Chat-ready text for results and failures.
//
// Messages are in Arabic like the site itself. Markdown-style `*bold*` is
// left for the messaging client to interpret.

use crate::error::{InfoError, ResolveError};
use crate::info::AnimeInfo;
use crate::resolver::EpisodeRequest;
use crate::site;
use crate::sources::ExtractedSource;

const UNAVAILABLE: &str = "غير متوفر";
const NO_DESCRIPTION: &str = "لا يوجد وصف متاح.";

pub const EPISODE_BUTTON_TITLE: &str = "مشاهدة الحلقة على الموقع";
pub const INFO_BUTTON_TITLE: &str = "عرض الحلقات على الموقع";

pub fn help() -> String {
    "للبحث عن أنمي، أرسل اسمه بالإنجليزية (مثال: One Piece).\n\n\
     لطلب حلقة معينة، أرسل اسم الأنمي متبوعًا برقم الحلقة (مثال: One Piece 3)"
        .to_string()
}

fn display_title(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Header line followed by one block per source.
pub fn episode_sources(request: &EpisodeRequest, sources: &[ExtractedSource]) -> String {
    let mut msg = format!(
        "🎥 روابط مشاهدة *{}* - الحلقة *{}*:\n\n",
        display_title(request.slug()),
        request.episode()
    );
    for source in sources {
        msg.push_str(&format!("💠 *{}*:\n{}\n\n", source.quality, source.url));
    }
    msg
}

/// Apology shown instead of sources.
pub fn episode_failure(request: &EpisodeRequest, err: &ResolveError) -> String {
    match err {
        ResolveError::NoPlayableSources(_) => {
            "❌ لم يتم العثور على أي روابط مشاهدة بجودة محددة في ملف المشغل.".to_string()
        }
        ResolveError::PlayerUrlNotFound(_) | ResolveError::UpstreamUnavailable(_) => format!(
            "❌ حدث خطأ أثناء جلب الحلقة رقم {} للأنمي {}. قد تكون الحلقة غير موجودة أو هناك مشكلة في الاستخراج.",
            request.episode(),
            display_title(request.slug())
        ),
    }
}

/// Link to the episode on the site itself.
pub fn episode_page_url(request: &EpisodeRequest) -> String {
    site::episode_url(site::BASE_URL, request.slug(), request.episode())
}

pub fn anime_info(info: &AnimeInfo) -> String {
    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| UNAVAILABLE.to_string());

    format!(
        "📌 *{}* \n\n\
         ⭐ التقييم: {}\n\
         📅 الحالة: {}\n\
         🎬 الاستوديو: {}\n\
         ✍ المؤلف: {}\n\
         🔞 التصنيف العمري: {}\n\n\
         📜 القصة:\n{}",
        info.title,
        field(&info.rating),
        field(&info.status),
        field(&info.studio),
        field(&info.author),
        field(&info.age_rating),
        info.description.as_deref().unwrap_or(NO_DESCRIPTION)
    )
}

pub fn info_failure(slug: &str, _err: &InfoError) -> String {
    format!("❌ لم أستطع العثور على الأنمي باسم: {slug}. تأكد من إدخال الاسم الإنجليزي الصحيح.")
}

//! Built-in list configurations for the dashboard's four entity kinds.

use crate::config::{ColumnDef, EntityConfig, EntityKind, FieldDef, FieldKind, FilterDef};
use crate::ordering::{Dir, SortSpec};

/// Configuration for `kind`.
pub fn for_kind(kind: EntityKind) -> EntityConfig {
    match kind {
        EntityKind::Donation => donations(),
        EntityKind::Member => members(),
        EntityKind::Application => applications(),
        EntityKind::Payment => payments(),
    }
}

/// Donation list (`/bagis/liste`).
pub fn donations() -> EntityConfig {
    EntityConfig::new(EntityKind::Donation)
        .field(FieldDef::new("makbuz_no", FieldKind::Text))
        .field(FieldDef::new("bagisci", FieldKind::Text))
        .field(FieldDef::new("telefon", FieldKind::Text).unsortable())
        .field(FieldDef::new("tutar", FieldKind::Number))
        .field(FieldDef::new("odeme_yontemi", FieldKind::Status))
        .field(FieldDef::new("amac", FieldKind::Status))
        .field(FieldDef::new("durum", FieldKind::Status))
        .field(FieldDef::new("tarih", FieldKind::Date))
        .field(FieldDef::new("aciklama", FieldKind::Text).unsortable())
        .searchable(["bagisci", "makbuz_no"])
        .column(ColumnDef::new("makbuz_no", "Makbuz No"))
        .column(ColumnDef::new("bagisci", "Bağışçı").fixed())
        .column(ColumnDef::new("tutar", "Tutar"))
        .column(ColumnDef::new("amac", "Amaç"))
        .column(ColumnDef::new("odeme_yontemi", "Ödeme Yöntemi"))
        .column(ColumnDef::new("durum", "Durum"))
        .column(ColumnDef::new("tarih", "Tarih"))
        .filter(
            FilterDef::new("durum", "Durum")
                .option("tamamlandi", "Tamamlandı")
                .option("beklemede", "Beklemede")
                .option("iptal", "İptal")
                .option("iade", "İade"),
        )
        .filter(
            FilterDef::new("amac", "Amaç")
                .option("genel", "Genel")
                .option("egitim", "Eğitim")
                .option("saglik", "Sağlık")
                .option("insani-yardim", "İnsani Yardım"),
        )
        .default_sort(SortSpec::single("tarih", Dir::Desc))
        .empty_message("Bağış bulunamadı")
}

/// Member list (`/uyeler/liste`).
pub fn members() -> EntityConfig {
    EntityConfig::new(EntityKind::Member)
        .field(FieldDef::new("uye_no", FieldKind::Text))
        .field(FieldDef::new("ad_soyad", FieldKind::Text))
        .field(FieldDef::new("telefon", FieldKind::Text).unsortable())
        .field(FieldDef::new("email", FieldKind::Text))
        .field(FieldDef::new("uye_turu", FieldKind::Status))
        .field(FieldDef::new("aidat_durumu", FieldKind::Status))
        .field(FieldDef::new("aidat", FieldKind::Number))
        .field(FieldDef::new("kayit_tarihi", FieldKind::Date))
        .searchable(["ad_soyad", "uye_no", "email"])
        .column(ColumnDef::new("uye_no", "Üye No"))
        .column(ColumnDef::new("ad_soyad", "Ad Soyad").fixed())
        .column(ColumnDef::new("telefon", "Telefon"))
        .column(ColumnDef::new("uye_turu", "Üye Türü"))
        .column(ColumnDef::new("aidat_durumu", "Aidat Durumu"))
        .column(ColumnDef::new("kayit_tarihi", "Kayıt Tarihi"))
        .filter(
            FilterDef::new("uye_turu", "Üye Türü")
                .option("aktif", "Aktif Üye")
                .option("onursal", "Onursal Üye")
                .option("genc", "Genç Üye")
                .option("destekci", "Destekçi"),
        )
        .filter(
            FilterDef::new("aidat_durumu", "Aidat Durumu")
                .option("guncel", "Güncel")
                .option("gecmis", "Gecikmiş")
                .option("muaf", "Muaf"),
        )
        .default_sort(SortSpec::single("kayit_tarihi", Dir::Desc))
        .empty_message("Üye bulunamadı")
}

/// Social-aid application list.
pub fn applications() -> EntityConfig {
    EntityConfig::new(EntityKind::Application)
        .field(FieldDef::new("basvuran", FieldKind::Text))
        .field(FieldDef::new("yardim_turu", FieldKind::Status))
        .field(FieldDef::new("talep_edilen_tutar", FieldKind::Number))
        .field(FieldDef::new("durum", FieldKind::Status))
        .field(FieldDef::new("basvuru_tarihi", FieldKind::Date))
        .searchable(["basvuran"])
        .column(ColumnDef::new("basvuran", "Başvuran").fixed())
        .column(ColumnDef::new("yardim_turu", "Yardım Türü"))
        .column(ColumnDef::new("talep_edilen_tutar", "Talep Edilen Tutar"))
        .column(ColumnDef::new("durum", "Durum"))
        .column(ColumnDef::new("basvuru_tarihi", "Başvuru Tarihi"))
        .filter(
            FilterDef::new("yardim_turu", "Yardım Türü")
                .option("ayni", "Ayni")
                .option("nakdi", "Nakdi")
                .option("egitim", "Eğitim")
                .option("saglik", "Sağlık")
                .option("kira", "Kira")
                .option("fatura", "Fatura"),
        )
        .filter(
            FilterDef::new("durum", "Durum")
                .option("beklemede", "Beklemede")
                .option("inceleniyor", "İnceleniyor")
                .option("onaylandi", "Onaylandı")
                .option("reddedildi", "Reddedildi")
                .option("odendi", "Ödendi"),
        )
        .default_sort(SortSpec::single("basvuru_tarihi", Dir::Desc))
        .empty_message("Başvuru bulunamadı")
}

/// Aid payment list.
pub fn payments() -> EntityConfig {
    EntityConfig::new(EntityKind::Payment)
        .field(FieldDef::new("makbuz_no", FieldKind::Text))
        .field(FieldDef::new("yararlanici", FieldKind::Text))
        .field(FieldDef::new("tutar", FieldKind::Number))
        .field(FieldDef::new("odeme_yontemi", FieldKind::Status))
        .field(FieldDef::new("odeme_tarihi", FieldKind::Date))
        .field(FieldDef::new("durum", FieldKind::Status))
        .searchable(["yararlanici", "makbuz_no"])
        .column(ColumnDef::new("yararlanici", "İhtiyaç Sahibi").fixed())
        .column(ColumnDef::new("tutar", "Tutar"))
        .column(ColumnDef::new("odeme_yontemi", "Ödeme Yöntemi"))
        .column(ColumnDef::new("odeme_tarihi", "Ödeme Tarihi"))
        .column(ColumnDef::new("durum", "Durum"))
        .filter(
            FilterDef::new("durum", "Durum")
                .option("beklemede", "Beklemede")
                .option("odendi", "Ödendi")
                .option("iptal", "İptal"),
        )
        .default_sort(SortSpec::single("odeme_tarihi", Dir::Desc))
        .empty_message("Ödeme bulunamadı")
}

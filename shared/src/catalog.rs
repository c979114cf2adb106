//! Static display metadata for the crops the recommender knows about
//!
//! Keyed by crop name, never by class id. The training job copies the entries
//! for every registry label into the model artifact, so serving resolves
//! display data from the artifact alone.

use std::collections::BTreeMap;

use crate::models::CropDescriptor;

/// (name, image URL) for every crop in the reference dataset, sorted by name
pub const KNOWN_CROPS: [(&str, &str); 22] = [
    ("apple", "https://m.media-amazon.com/images/I/61vaD-P9BoL._AC_UF1000,1000_QL80_.jpg"),
    ("banana", "https://www.happysprout.com/wp-content/uploads/sites/4/2021/02/banana-tree-with-ripe-fruit.jpg"),
    ("blackgram", "https://apseeds.ap.gov.in/Assets/Images/inner-pages-img/Blackgram.jpg"),
    ("chickpea", "https://gruloda.com/wp-content/uploads/2023/03/The-Ultimate-Guide-to-Growing-Chickpeas-min.jpg"),
    ("coconut", "https://cdn.britannica.com/67/143467-050-D161947F/Coconut-palm.jpg"),
    ("coffee", "https://methodicalcoffee.com/cdn/shop/articles/coffee_beans_1024x.jpg?v=1690475666"),
    ("cotton", "https://www.theenvironmentalblog.org/wp-content/uploads/2024/10/Cotton-from-Plant.jpeg"),
    ("grapes", "https://seasol.com.au/wp-content/uploads/2021/09/31490001_L-e1652140275372.jpg"),
    ("jute", "https://img.ehowcdn.com/640/cme-data/getty%2F83bc254ce0ae4fdcbbeb22378de615fa.jpg"),
    ("kidneybeans", "https://minnetonkaorchards.com/wp-content/uploads/2022/09/Kidney-Bean-Pods-SS-1447247864.jpg"),
    ("lentil", "https://www.nativeseeds.org/cdn/shop/products/Raramuri_TarahumaraPinks_Lentils_LE002_550x.jpg?v=1660689386"),
    ("maize", "https://agritech.tnau.ac.in/agriculture//maize-272894_1280.jpg"),
    ("mango", "https://m.media-amazon.com/images/I/71u-Dvj9FkL.jpg"),
    ("mothbeans", "https://thepaharilife.com/cdn/shop/products/Soybeans_300x300.jpg?v=1597947077"),
    ("mungbean", "https://www.shutterstock.com/image-photo/mung-bean-crop-planting-thailand-260nw-1250959141.jpg"),
    ("muskmelon", "https://plantic.in/pimg/pl-muskmelon-f1-hybrid-nirupama/pl-muskmelon-f1-hybrid-nirupama1.png"),
    ("orange", "https://plantparadise.in/cdn/shop/files/valencia_orange_tree_2000x.jpg2.jpg?v=1691936340"),
    ("papaya", "https://m.media-amazon.com/images/I/61NHIM4UzqL._AC_UF1000,1000_QL80_.jpg"),
    ("pigeonpeas", "https://i.pinimg.com/736x/f5/07/0a/f5070a9150c58be51e3843de3f613fe2.jpg"),
    ("pomegranate", "https://nurserylive.com/cdn/shop/products/nurserylive-pomegranate-annar-anar-grafted-plant-368942.jpg?v=1679750942"),
    ("rice", "https://eos.com/wp-content/uploads/2023/04/rice-field.jpg.webp"),
    ("watermelon", "https://bonnieplants.com/cdn/shop/articles/BONNIE_watermelon_iStock-181067852-1800px_28032150-26a6-4cda-be5b-c4408112e3a6.jpg?v=1642541981"),
];

/// Image URL of a known crop
pub fn image_url(name: &str) -> Option<&'static str> {
    KNOWN_CROPS
        .binary_search_by(|(crop, _)| (*crop).cmp(name))
        .ok()
        .map(|idx| KNOWN_CROPS[idx].1)
}

/// Descriptor of a known crop
pub fn descriptor(name: &str) -> Option<CropDescriptor> {
    image_url(name).map(|url| CropDescriptor::new(name, url))
}

/// Image URL table for the given labels; labels unknown to the catalog are left out
pub fn image_table<'a, I>(labels: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    labels
        .into_iter()
        .filter_map(|label| image_url(label).map(|url| (label.to_string(), url.to_string())))
        .collect()
}

pub fn is_known_crop(name: &str) -> bool {
    image_url(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_sorted_and_distinct() {
        for pair in KNOWN_CROPS.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_lookup() {
        assert!(image_url("rice").unwrap().contains("rice-field"));
        assert_eq!(image_url("wheat"), None);
        assert_eq!(descriptor("mango").unwrap().name, "mango");
        assert!(is_known_crop("watermelon"));
        assert!(!is_known_crop("Rice"));
    }

    #[test]
    fn test_image_table_skips_unknown_labels() {
        let table = image_table(["rice", "wheat", "apple"]);
        assert_eq!(table.len(), 2);
        assert!(table.contains_key("rice"));
        assert!(!table.contains_key("wheat"));
    }
}

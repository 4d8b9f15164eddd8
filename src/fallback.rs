//! Static category tree served when no backend snapshot is available.

use serde_json::{json, Value};

use crate::domain::aggregates::CategoryNode;

pub fn static_tree_json() -> Value {
    json!([
        {
            "id": "noi-that",
            "name": "Nội thất",
            "icon": "sofa",
            "href": "/danh-muc/noi-that",
            "children": [
                {
                    "id": "ghe-va-tua",
                    "name": "Ghế và tựa",
                    "children": [
                        { "name": "Ghế xoay văn phòng", "href": "/san-pham/ghe-xoay-van-phong", "slug": "ghe-xoay-van-phong" },
                        { "name": "Ghế gỗ cao su", "href": "/san-pham/ghe-go-cao-su", "slug": "ghe-go-cao-su" },
                        { "name": "Ghế công thái học", "href": "/san-pham/ghe-cong-thai-hoc", "slug": "ghe-cong-thai-hoc", "badge": "Mới" },
                        { "name": "Ghế đôn bọc nỉ", "href": "/san-pham/ghe-don-boc-ni", "slug": "ghe-don-boc-ni" }
                    ]
                },
                {
                    "id": "ban",
                    "name": "Bàn",
                    "children": [
                        { "name": "Bàn làm việc gấp gọn", "href": "/san-pham/ban-lam-viec-gap-gon", "slug": "ban-lam-viec-gap-gon" },
                        { "name": "Bàn trà mặt kính", "href": "/san-pham/ban-tra-mat-kinh", "slug": "ban-tra-mat-kinh", "price": 2450000, "originalPrice": 2990000 },
                        { "name": "Bàn ăn 6 ghế", "href": "/san-pham/ban-an-6-ghe", "slug": "ban-an-6-ghe" }
                    ]
                },
                {
                    "id": "sofa",
                    "name": "Sofa",
                    "children": [
                        { "name": "Sofa băng 3 chỗ", "href": "/san-pham/sofa-bang-3-cho", "slug": "sofa-bang-3-cho", "rating": 4.76 },
                        { "name": "Sofa góc chữ L", "href": "/san-pham/sofa-goc-chu-l", "slug": "sofa-goc-chu-l" }
                    ]
                }
            ]
        },
        {
            "id": "den-trang-tri",
            "name": "Đèn trang trí",
            "icon": "lamp",
            "href": "/danh-muc/den-trang-tri",
            "children": [
                {
                    "id": "den-ban",
                    "name": "Đèn bàn",
                    "children": [
                        { "name": "Đèn bàn LED chống cận", "href": "/san-pham/den-ban-led", "slug": "den-ban-led", "discountPercent": 20 },
                        { "name": "Đèn ngủ gốm sứ", "href": "/san-pham/den-ngu-gom-su", "slug": "den-ngu-gom-su" }
                    ]
                },
                {
                    "id": "den-tran",
                    "name": "Đèn trần",
                    "children": [
                        { "name": "Đèn chùm pha lê", "href": "/san-pham/den-chum-pha-le", "slug": "den-chum-pha-le" },
                        { "name": "Đèn ốp trần tròn", "href": "/san-pham/den-op-tran-tron", "slug": "den-op-tran-tron" },
                        { "name": "Đèn thả bàn ăn", "href": "/san-pham/den-tha-ban-an", "slug": "den-tha-ban-an" }
                    ]
                }
            ]
        },
        {
            "id": "trang-tri",
            "name": "Trang trí",
            "icon": "frame",
            "href": "/danh-muc/trang-tri",
            "children": [
                {
                    "id": "tham",
                    "name": "Thảm",
                    "children": [
                        { "name": "Thảm lông phòng khách", "href": "/san-pham/tham-long", "slug": "tham-long" },
                        { "name": "Thảm cói", "href": "/san-pham/tham-coi", "slug": "tham-coi", "inStock": false }
                    ]
                },
                { "id": "tranh", "name": "Tranh treo tường", "children": [] }
            ]
        }
    ])
}

pub fn static_tree() -> Vec<CategoryNode> { CategoryNode::tree_from_json(&static_tree_json()) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_tree_shape() {
        let tree = static_tree();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.iter().map(CategoryNode::item_count).sum::<usize>(), 16);
        assert_eq!(tree[0].children[0].id, "ghe-va-tua");
        assert_eq!(tree[2].children[1].children.len(), 0);
    }
}

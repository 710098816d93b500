//! Ambiguous corner configurations of the unit cube.
//!
//! Entry `code` lists the groups of set corners of case code `code` that are
//! linked by cube edges, lowest corner first, whenever the set corners fall
//! apart into two or more such groups. Codes whose set corners form a single
//! group map to an empty list.
//!
//! Corner `i` of a case code is bit `i`. Corners 0..4 form the lower face
//! in cyclic order and corner `i + 4` sits above corner `i`.
//!
//! The entries are generated from that edge-separation rule, not taken from
//! a published marching-cubes table; `ambiguity/tests.rs` re-derives them.

pub static OUTLIER_CASES: [&[&[u8]]; 256] = [
    &[], // 0
    &[], // 1
    &[], // 2
    &[], // 3
    &[], // 4
    &[&[0], &[2]], // 5
    &[], // 6
    &[], // 7
    &[], // 8
    &[], // 9
    &[&[1], &[3]], // 10
    &[], // 11
    &[], // 12
    &[], // 13
    &[], // 14
    &[], // 15
    &[], // 16
    &[], // 17
    &[&[1], &[4]], // 18
    &[], // 19
    &[&[2], &[4]], // 20
    &[&[0, 4], &[2]], // 21
    &[&[1, 2], &[4]], // 22
    &[], // 23
    &[&[3], &[4]], // 24
    &[], // 25
    &[&[1], &[3], &[4]], // 26
    &[], // 27
    &[&[2, 3], &[4]], // 28
    &[], // 29
    &[&[1, 2, 3], &[4]], // 30
    &[], // 31
    &[], // 32
    &[&[0], &[5]], // 33
    &[], // 34
    &[], // 35
    &[&[2], &[5]], // 36
    &[&[0], &[2], &[5]], // 37
    &[], // 38
    &[], // 39
    &[&[3], &[5]], // 40
    &[&[0, 3], &[5]], // 41
    &[&[1, 5], &[3]], // 42
    &[], // 43
    &[&[2, 3], &[5]], // 44
    &[&[0, 2, 3], &[5]], // 45
    &[], // 46
    &[], // 47
    &[], // 48
    &[], // 49
    &[], // 50
    &[], // 51
    &[&[2], &[4, 5]], // 52
    &[&[0, 4, 5], &[2]], // 53
    &[], // 54
    &[], // 55
    &[&[3], &[4, 5]], // 56
    &[], // 57
    &[&[1, 4, 5], &[3]], // 58
    &[], // 59
    &[&[2, 3], &[4, 5]], // 60
    &[], // 61
    &[], // 62
    &[], // 63
    &[], // 64
    &[&[0], &[6]], // 65
    &[&[1], &[6]], // 66
    &[&[0, 1], &[6]], // 67
    &[], // 68
    &[&[0], &[2, 6]], // 69
    &[], // 70
    &[], // 71
    &[&[3], &[6]], // 72
    &[&[0, 3], &[6]], // 73
    &[&[1], &[3], &[6]], // 74
    &[&[0, 1, 3], &[6]], // 75
    &[], // 76
    &[], // 77
    &[], // 78
    &[], // 79
    &[&[4], &[6]], // 80
    &[&[0, 4], &[6]], // 81
    &[&[1], &[4], &[6]], // 82
    &[&[0, 1, 4], &[6]], // 83
    &[&[2, 6], &[4]], // 84
    &[&[0, 4], &[2, 6]], // 85
    &[&[1, 2, 6], &[4]], // 86
    &[], // 87
    &[&[3], &[4], &[6]], // 88
    &[&[0, 3, 4], &[6]], // 89
    &[&[1], &[3], &[4], &[6]], // 90
    &[&[0, 1, 3, 4], &[6]], // 91
    &[&[2, 3, 6], &[4]], // 92
    &[], // 93
    &[&[1, 2, 3, 6], &[4]], // 94
    &[], // 95
    &[], // 96
    &[&[0], &[5, 6]], // 97
    &[], // 98
    &[], // 99
    &[], // 100
    &[&[0], &[2, 5, 6]], // 101
    &[], // 102
    &[], // 103
    &[&[3], &[5, 6]], // 104
    &[&[0, 3], &[5, 6]], // 105
    &[&[1, 5, 6], &[3]], // 106
    &[], // 107
    &[], // 108
    &[], // 109
    &[], // 110
    &[], // 111
    &[], // 112
    &[], // 113
    &[], // 114
    &[], // 115
    &[], // 116
    &[], // 117
    &[], // 118
    &[], // 119
    &[&[3], &[4, 5, 6]], // 120
    &[], // 121
    &[&[1, 4, 5, 6], &[3]], // 122
    &[], // 123
    &[], // 124
    &[], // 125
    &[], // 126
    &[], // 127
    &[], // 128
    &[&[0], &[7]], // 129
    &[&[1], &[7]], // 130
    &[&[0, 1], &[7]], // 131
    &[&[2], &[7]], // 132
    &[&[0], &[2], &[7]], // 133
    &[&[1, 2], &[7]], // 134
    &[&[0, 1, 2], &[7]], // 135
    &[], // 136
    &[], // 137
    &[&[1], &[3, 7]], // 138
    &[], // 139
    &[], // 140
    &[], // 141
    &[], // 142
    &[], // 143
    &[], // 144
    &[], // 145
    &[&[1], &[4, 7]], // 146
    &[], // 147
    &[&[2], &[4, 7]], // 148
    &[&[0, 4, 7], &[2]], // 149
    &[&[1, 2], &[4, 7]], // 150
    &[], // 151
    &[], // 152
    &[], // 153
    &[&[1], &[3, 4, 7]], // 154
    &[], // 155
    &[], // 156
    &[], // 157
    &[], // 158
    &[], // 159
    &[&[5], &[7]], // 160
    &[&[0], &[5], &[7]], // 161
    &[&[1, 5], &[7]], // 162
    &[&[0, 1, 5], &[7]], // 163
    &[&[2], &[5], &[7]], // 164
    &[&[0], &[2], &[5], &[7]], // 165
    &[&[1, 2, 5], &[7]], // 166
    &[&[0, 1, 2, 5], &[7]], // 167
    &[&[3, 7], &[5]], // 168
    &[&[0, 3, 7], &[5]], // 169
    &[&[1, 5], &[3, 7]], // 170
    &[], // 171
    &[&[2, 3, 7], &[5]], // 172
    &[&[0, 2, 3, 7], &[5]], // 173
    &[], // 174
    &[], // 175
    &[], // 176
    &[], // 177
    &[], // 178
    &[], // 179
    &[&[2], &[4, 5, 7]], // 180
    &[&[0, 4, 5, 7], &[2]], // 181
    &[], // 182
    &[], // 183
    &[], // 184
    &[], // 185
    &[], // 186
    &[], // 187
    &[], // 188
    &[], // 189
    &[], // 190
    &[], // 191
    &[], // 192
    &[&[0], &[6, 7]], // 193
    &[&[1], &[6, 7]], // 194
    &[&[0, 1], &[6, 7]], // 195
    &[], // 196
    &[&[0], &[2, 6, 7]], // 197
    &[], // 198
    &[], // 199
    &[], // 200
    &[], // 201
    &[&[1], &[3, 6, 7]], // 202
    &[], // 203
    &[], // 204
    &[], // 205
    &[], // 206
    &[], // 207
    &[], // 208
    &[], // 209
    &[&[1], &[4, 6, 7]], // 210
    &[], // 211
    &[], // 212
    &[], // 213
    &[], // 214
    &[], // 215
    &[], // 216
    &[], // 217
    &[&[1], &[3, 4, 6, 7]], // 218
    &[], // 219
    &[], // 220
    &[], // 221
    &[], // 222
    &[], // 223
    &[], // 224
    &[&[0], &[5, 6, 7]], // 225
    &[], // 226
    &[], // 227
    &[], // 228
    &[&[0], &[2, 5, 6, 7]], // 229
    &[], // 230
    &[], // 231
    &[], // 232
    &[], // 233
    &[], // 234
    &[], // 235
    &[], // 236
    &[], // 237
    &[], // 238
    &[], // 239
    &[], // 240
    &[], // 241
    &[], // 242
    &[], // 243
    &[], // 244
    &[], // 245
    &[], // 246
    &[], // 247
    &[], // 248
    &[], // 249
    &[], // 250
    &[], // 251
    &[], // 252
    &[], // 253
    &[], // 254
    &[], // 255
];
